//! Shared helpers for launcher integration tests.
//!
//! Fake workers are POSIX shell scripts: the script inspects its `--chain`
//! argument and either prints a credential made of 64 copies of the chain
//! character, sleeps forever (chain `slow`), or exits silently (no chain).

// not every test file uses every helper
#![allow(dead_code)]

use chainup_core::{Catalog, Config, CoreWorkers, Indexer, WorkerCommand, WorkerDescriptor};
use launcher::terminal::{LaunchRequest, TerminalError, TerminalLauncher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A worker command that runs an inline shell script
pub fn shell_worker(dir: &Path, script: &str) -> WorkerCommand {
  WorkerCommand {
    program: "sh".to_string(),
    args: vec!["-c".to_string(), script.to_string()],
    dir: dir.to_path_buf(),
  }
}

const FAKE_WORKER: &str = r#"
chain=none
while [ "$#" -gt 0 ]; do
  if [ "$1" = "--chain" ] && [ "$#" -gt 1 ]; then
    chain="$2"
    shift
  fi
  shift
done
case "$chain" in
  slow)
    sleep 30
    ;;
  none)
    exit 0
    ;;
  *)
    printf 'RPC Public Key: '
    i=0
    while [ "$i" -lt 64 ]; do
      printf '%s' "$chain"
      i=$((i+1))
    done
    printf '\n'
    sleep 30
    ;;
esac
"#;

/// Write the fake worker script into `dir` and return its path
pub fn write_fake_worker(dir: &Path) -> PathBuf {
  let path = dir.join("fake_worker.sh");
  std::fs::write(&path, FAKE_WORKER).expect("write fake worker script");
  path
}

/// Config pointing the worker runtime at the fake worker script
pub fn test_config(script: &Path, timeout_ms: u64) -> Config {
  let mut config = Config::default();
  config.runtime.program = "sh".to_string();
  config.runtime.entry = script.to_string_lossy().into_owned();
  config.capture.timeout_ms = timeout_ms;
  config.launch.settle_delay_ms = 10;
  config
}

pub fn test_indexer(dir: &Path, id: &str, chain: &str) -> Indexer {
  let name = id.to_uppercase();
  Indexer {
    id: id.to_string(),
    name: name.clone(),
    proc: descriptor(dir, &format!("{id}-proc"), Some(chain), &format!("{name} Processor")),
    api: descriptor(dir, &format!("{id}-api"), Some(chain), &format!("{name} API")),
  }
}

/// Core workers for tests; `shard_chain` controls whether the data-shard
/// capture can succeed against the fake worker
pub fn test_core(dir: &Path, shard_chain: Option<&str>) -> CoreWorkers {
  CoreWorkers {
    data_shard_proc: descriptor(dir, "data-shard-proc", shard_chain, "Data Shard Processor"),
    data_shard_api: descriptor(dir, "data-shard-api", shard_chain, "Data Shard API Worker"),
    ork: descriptor(dir, "ork-api", None, "ORK API Worker"),
    http: descriptor(dir, "node-http", None, "HTTP Node Worker"),
  }
}

pub fn test_catalog(dir: &Path, shard_chain: Option<&str>) -> Catalog {
  Catalog::new(
    vec![
      test_indexer(dir, "alpha", "a"),
      test_indexer(dir, "beta", "b"),
      test_indexer(dir, "stuck", "slow"),
    ],
    test_core(dir, shard_chain),
  )
}

fn descriptor(dir: &Path, wtype: &str, chain: Option<&str>, title: &str) -> WorkerDescriptor {
  WorkerDescriptor {
    dir: dir.to_path_buf(),
    wtype: wtype.to_string(),
    rack: Some(format!("r-{wtype}")),
    chain: chain.map(str::to_string),
    port: None,
    title: title.to_string(),
    description: format!("{title} (test)"),
  }
}

/// Terminal launcher that records requests instead of opening windows
pub struct RecordingTerminal {
  launches: Mutex<Vec<LaunchRequest>>,
}

impl RecordingTerminal {
  pub fn new() -> Arc<Self> {
    Arc::new(Self {
      launches: Mutex::new(Vec::new()),
    })
  }

  pub fn launches(&self) -> Vec<LaunchRequest> {
    self.launches.lock().unwrap().clone()
  }

  /// Index of the first launch whose title matches, panicking if absent
  pub fn position(&self, title: &str) -> usize {
    self
      .launches()
      .iter()
      .position(|request| request.title == title)
      .unwrap_or_else(|| panic!("no launch titled {title:?}"))
  }
}

impl TerminalLauncher for RecordingTerminal {
  fn launch(&self, request: &LaunchRequest) -> Result<(), TerminalError> {
    self.launches.lock().unwrap().push(request.clone());
    Ok(())
  }
}
