//! Staged-startup orchestration against fake workers and a recording
//! terminal launcher.

#![cfg(unix)]

mod common;

use chainup_core::{Environment, Selection};
use common::{RecordingTerminal, test_catalog, test_config, write_fake_worker};
use launcher::orchestrator::Orchestrator;
use std::time::Instant;
use tempfile::TempDir;

fn key(c: char) -> String {
  std::iter::repeat_n(c, 64).collect()
}

fn selection(ids: &[&str]) -> Selection {
  Selection::new(Environment::Development, false, ids.iter().map(|s| s.to_string()).collect())
}

#[tokio::test]
async fn test_happy_path_launches_pairs_then_core() {
  let dir = TempDir::new().unwrap();
  let script = write_fake_worker(dir.path());
  let terminal = RecordingTerminal::new();
  let orchestrator = Orchestrator::new(
    test_catalog(dir.path(), Some("d")),
    test_config(&script, 2000),
    Environment::Development,
    terminal.clone(),
  );

  let report = orchestrator.run(&selection(&["alpha", "beta"])).await;

  assert_eq!(report.indexers.len(), 2);
  assert!(report.indexers.iter().all(|o| o.credential_captured && o.api_launched));
  assert!(report.data_shard_credential_captured);
  assert!(report.data_shard_api_launched);

  let launches = terminal.launches();
  assert_eq!(launches.len(), 8);

  // each API worker got its own processor's credential
  let alpha_api = &launches[terminal.position("ALPHA API")];
  assert!(alpha_api.command_line.contains(&format!("--proc-rpc {}", key('a'))));
  let beta_api = &launches[terminal.position("BETA API")];
  assert!(beta_api.command_line.contains(&format!("--proc-rpc {}", key('b'))));
  let shard_api = &launches[terminal.position("Data Shard API Worker")];
  assert!(shard_api.command_line.contains(&format!("--proc-rpc {}", key('d'))));

  // processors launch without a credential flag
  let alpha_proc = &launches[terminal.position("ALPHA Processor")];
  assert!(!alpha_proc.command_line.contains("--proc-rpc"));
}

#[tokio::test]
async fn test_core_workers_launch_only_after_all_attempts_resolve() {
  let dir = TempDir::new().unwrap();
  let script = write_fake_worker(dir.path());
  let terminal = RecordingTerminal::new();
  // the "stuck" indexer never prints, so its capture runs to the timeout
  let orchestrator = Orchestrator::new(
    test_catalog(dir.path(), Some("d")),
    test_config(&script, 300),
    Environment::Development,
    terminal.clone(),
  );

  let start = Instant::now();
  let report = orchestrator.run(&selection(&["alpha", "stuck"])).await;

  let alpha = report.indexers.iter().find(|o| o.id == "alpha").unwrap();
  assert!(alpha.api_launched);
  let stuck = report.indexers.iter().find(|o| o.id == "stuck").unwrap();
  assert!(!stuck.credential_captured);
  assert!(!stuck.api_launched);

  let launches = terminal.launches();
  // alpha pair + stuck processor alone + four core workers
  assert_eq!(launches.len(), 7);
  assert!(!launches.iter().any(|l| l.title == "STUCK API"));

  // the failed indexer's processor still launched, and core staging waited
  // for the timed-out attempt, not just the successful one
  let shard_proc = terminal.position("Data Shard Processor");
  assert!(shard_proc > terminal.position("ALPHA API"));
  assert!(shard_proc > terminal.position("STUCK Processor"));
  assert!(start.elapsed().as_millis() >= 300);
}

#[tokio::test]
async fn test_single_selection_touches_only_that_pair() {
  let dir = TempDir::new().unwrap();
  let script = write_fake_worker(dir.path());
  let terminal = RecordingTerminal::new();
  let orchestrator = Orchestrator::new(
    test_catalog(dir.path(), Some("d")),
    test_config(&script, 2000),
    Environment::Development,
    terminal.clone(),
  );

  orchestrator.run(&selection(&["alpha"])).await;

  let launches = terminal.launches();
  assert!(launches.iter().any(|l| l.title == "ALPHA Processor"));
  assert!(!launches.iter().any(|l| l.title.starts_with("BETA")));
  assert!(!launches.iter().any(|l| l.title.starts_with("STUCK")));
  // alpha pair + four core workers
  assert_eq!(launches.len(), 6);
}

#[tokio::test]
async fn test_shard_capture_failure_skips_shard_api_only() {
  let dir = TempDir::new().unwrap();
  let script = write_fake_worker(dir.path());
  let terminal = RecordingTerminal::new();
  // shard descriptors carry no chain, so the fake worker exits silently
  let orchestrator = Orchestrator::new(
    test_catalog(dir.path(), None),
    test_config(&script, 500),
    Environment::Development,
    terminal.clone(),
  );

  let report = orchestrator.run(&selection(&["alpha"])).await;

  assert!(!report.data_shard_credential_captured);
  assert!(!report.data_shard_api_launched);

  let launches = terminal.launches();
  assert!(!launches.iter().any(|l| l.title == "Data Shard API Worker"));
  // the shard processor and the trailing core workers still launch
  assert!(launches.iter().any(|l| l.title == "Data Shard Processor"));
  assert!(launches.iter().any(|l| l.title == "ORK API Worker"));
  assert!(launches.iter().any(|l| l.title == "HTTP Node Worker"));
}

#[tokio::test]
async fn test_env_flows_into_every_command() {
  let dir = TempDir::new().unwrap();
  let script = write_fake_worker(dir.path());
  let terminal = RecordingTerminal::new();
  let orchestrator = Orchestrator::new(
    test_catalog(dir.path(), Some("d")),
    test_config(&script, 2000),
    Environment::Staging,
    terminal.clone(),
  );

  orchestrator
    .run(&Selection::new(Environment::Staging, false, vec!["alpha".to_string()]))
    .await;

  for launch in terminal.launches() {
    assert!(launch.command_line.contains("--env staging"), "{}", launch.command_line);
  }
}
