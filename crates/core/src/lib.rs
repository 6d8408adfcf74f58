//! Core types for the chainup development launcher.
//!
//! Holds the static worker catalog, layered configuration, the selection
//! model, the worker command builder, and the credential value type shared
//! by the launcher and CLI crates. Nothing here spawns a process.

pub mod catalog;
pub mod command;
pub mod config;
pub mod credential;
pub mod selection;

pub use catalog::{Catalog, CoreWorkers, Indexer, WorkerDescriptor};
pub use command::{WorkerCommand, build_worker_command};
pub use config::{Config, Environment, InvalidEnvironment, RuntimeConfig};
pub use credential::{Credential, CredentialError};
pub use selection::Selection;
