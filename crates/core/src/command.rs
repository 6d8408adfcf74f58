//! Worker invocation builder.
//!
//! A pure mapping from a descriptor to the ordered argument list a worker is
//! started with; the launcher uses the same command for credential capture
//! (credential absent) and terminal launch (credential present for API
//! workers).

use crate::catalog::WorkerDescriptor;
use crate::config::{Environment, RuntimeConfig};
use crate::credential::Credential;
use std::path::PathBuf;

/// A fully built worker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
  pub program: String,
  pub args: Vec<String>,
  /// Directory the worker runs in
  pub dir: PathBuf,
}

impl WorkerCommand {
  /// Render as a single shell command line. Worker arguments are catalog
  /// values and contain no shell metacharacters, so no quoting is applied.
  pub fn to_line(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      line.push_str(arg);
    }
    line
  }
}

/// Build the invocation for `worker`.
///
/// Argument order is fixed: entry script, worker type, environment, then
/// rack/chain/port for descriptors that carry them, then the credential flag
/// only when a credential is supplied.
pub fn build_worker_command(
  worker: &WorkerDescriptor,
  runtime: &RuntimeConfig,
  env: Environment,
  credential: Option<&Credential>,
) -> WorkerCommand {
  let mut args = vec![
    runtime.entry.clone(),
    "--wtype".to_string(),
    worker.wtype.clone(),
    "--env".to_string(),
    env.as_str().to_string(),
  ];

  if let Some(rack) = &worker.rack {
    args.push("--rack".to_string());
    args.push(rack.clone());
  }

  if let Some(chain) = &worker.chain {
    args.push("--chain".to_string());
    args.push(chain.clone());
  }

  if let Some(port) = worker.port {
    args.push("--port".to_string());
    args.push(port.to_string());
  }

  if let Some(credential) = credential {
    args.push("--proc-rpc".to_string());
    args.push(credential.as_str().to_string());
  }

  WorkerCommand {
    program: runtime.program.clone(),
    args,
    dir: worker.dir.clone(),
  }
}
