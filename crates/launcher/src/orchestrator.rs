//! Staged startup across indexer and core workers.
//!
//! Phase 1 runs every selected indexer concurrently: capture the processor's
//! credential, open the processor in a terminal, then open its API worker
//! with the captured credential. The data-shard processor's credential is
//! captured alongside. Phase 2 starts the core workers in order, and only
//! after every phase-1 attempt has resolved: the data shard looks up the
//! indexers' published topics at startup, so the ordering is enforced by
//! staging and settle delays rather than an acknowledgment protocol.
//!
//! Worker-level failures never abort the run: a failed capture is logged,
//! the processor is started anyway, and its API worker is skipped.

use crate::capture::capture_credential;
use crate::terminal::{LaunchRequest, TerminalLauncher};
use chainup_core::{
  Catalog, Config, Credential, Environment, Indexer, Selection, WorkerDescriptor, build_worker_command,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Outcome of one indexer's startup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerOutcome {
  pub id: String,
  pub name: String,
  pub credential_captured: bool,
  pub api_launched: bool,
}

/// What a run did, for the final summary
#[derive(Debug, Clone, Default)]
pub struct StartupReport {
  pub indexers: Vec<IndexerOutcome>,
  pub data_shard_credential_captured: bool,
  pub data_shard_api_launched: bool,
}

/// Drives the full startup sequence for one selection
pub struct Orchestrator {
  catalog: Catalog,
  config: Config,
  env: Environment,
  terminal: Arc<dyn TerminalLauncher>,
}

impl Orchestrator {
  pub fn new(catalog: Catalog, config: Config, env: Environment, terminal: Arc<dyn TerminalLauncher>) -> Self {
    Self {
      catalog,
      config,
      env,
      terminal,
    }
  }

  fn capture_timeout(&self) -> Duration {
    Duration::from_millis(self.config.capture.timeout_ms)
  }

  async fn settle(&self) {
    tokio::time::sleep(Duration::from_millis(self.config.launch.settle_delay_ms)).await;
  }

  /// Open one worker in a terminal window; launch errors are logged and
  /// swallowed so they cannot affect other launches
  fn launch_in_terminal(&self, worker: &WorkerDescriptor, credential: Option<&Credential>) {
    let cmd = build_worker_command(worker, &self.config.runtime, self.env, credential);
    let request = LaunchRequest {
      title: worker.title.clone(),
      dir: cmd.dir.clone(),
      description: worker.description.clone(),
      command_line: cmd.to_line(),
    };
    info!(worker = %worker.title, "starting worker");
    if let Err(e) = self.terminal.launch(&request) {
      error!(worker = %worker.title, err = %e, "failed to open terminal");
    }
  }

  async fn capture_for(&self, worker: &WorkerDescriptor) -> Option<Credential> {
    info!(worker = %worker.title, "capturing credential");
    let cmd = build_worker_command(worker, &self.config.runtime, self.env, None);
    match capture_credential(&cmd, self.capture_timeout()).await {
      Ok(credential) => {
        info!(worker = %worker.title, credential = %credential.preview(), "credential captured");
        Some(credential)
      }
      Err(e) => {
        error!(worker = %worker.title, err = %e, "credential capture failed");
        None
      }
    }
  }

  /// One indexer's startup: capture, then processor, settle, API
  async fn start_indexer(&self, indexer: &Indexer) -> IndexerOutcome {
    match self.capture_for(&indexer.proc).await {
      Some(credential) => {
        self.launch_in_terminal(&indexer.proc, None);
        self.settle().await;
        self.launch_in_terminal(&indexer.api, Some(&credential));
        IndexerOutcome {
          id: indexer.id.clone(),
          name: indexer.name.clone(),
          credential_captured: true,
          api_launched: true,
        }
      }
      None => {
        warn!(indexer = %indexer.name, "starting processor without a credential; API worker skipped");
        self.launch_in_terminal(&indexer.proc, None);
        IndexerOutcome {
          id: indexer.id.clone(),
          name: indexer.name.clone(),
          credential_captured: false,
          api_launched: false,
        }
      }
    }
  }

  /// Run the full startup sequence. Only resolver-level errors are fatal to
  /// the caller and those happen before an orchestrator exists; this method
  /// always runs to completion.
  pub async fn run(&self, selection: &Selection) -> StartupReport {
    let selected: Vec<&Indexer> = selection
      .indexer_ids(&self.catalog)
      .into_iter()
      .filter_map(|id| self.catalog.indexer(id))
      .collect();

    info!(
      count = selected.len(),
      env = %self.env,
      "phase 1: capturing credentials and starting indexer workers"
    );

    let indexer_futures = selected.iter().map(|indexer| self.start_indexer(indexer));
    let shard_capture = self.capture_for(&self.catalog.core().data_shard_proc);

    // every capture attempt is issued before any is awaited; the join is the
    // barrier phase 2 waits behind
    let (indexers, shard_credential) = tokio::join!(join_all(indexer_futures), shard_capture);

    info!("phase 2: starting core workers");

    let core = self.catalog.core();
    self.launch_in_terminal(&core.data_shard_proc, None);
    self.settle().await;

    let data_shard_api_launched = match &shard_credential {
      Some(credential) => {
        self.launch_in_terminal(&core.data_shard_api, Some(credential));
        true
      }
      None => {
        warn!(worker = %core.data_shard_api.title, "skipping launch; no credential available");
        false
      }
    };
    self.settle().await;

    // independent of each other; order between the two is immaterial
    self.launch_in_terminal(&core.ork, None);
    self.launch_in_terminal(&core.http, None);

    StartupReport {
      indexers,
      data_shard_credential_captured: shard_credential.is_some(),
      data_shard_api_launched,
    }
  }
}
