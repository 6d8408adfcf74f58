//! Worker launching for the chainup development environment.
//!
//! Three pieces: the credential-capture protocol (scrape a processor
//! worker's output for its RPC credential), the terminal-launcher
//! abstraction with one backend per platform, and the staged startup
//! orchestrator that sequences captures and launches across the fleet.

pub mod capture;
pub mod orchestrator;
pub mod terminal;

pub use capture::{CaptureError, capture_credential};
pub use orchestrator::{IndexerOutcome, Orchestrator, StartupReport};
pub use terminal::{LaunchRequest, TerminalError, TerminalLauncher};
