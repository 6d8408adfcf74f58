//! Configuration for the chainup launcher with per-project overrides.
//!
//! Config priority: project-relative (./chainup.toml) > user (~/.config/chainup/config.toml)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Project config file name, looked up in the directory chainup runs from
pub const CONFIG_FILE: &str = "chainup.toml";

// ============================================================================
// Environment
// ============================================================================

/// Deployment environment workers are started against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  #[default]
  Development,
  Staging,
  Production,
}

impl Environment {
  /// All valid environments, in the order they are listed to the user
  pub const ALL: &[Environment] = &[Environment::Development, Environment::Staging, Environment::Production];

  /// The value passed to workers as `--env`
  pub fn as_str(&self) -> &'static str {
    match self {
      Environment::Development => "development",
      Environment::Staging => "staging",
      Environment::Production => "production",
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Rejected environment value, carrying the valid set for the error message
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid environment '{0}'; valid options: development, staging, production")]
pub struct InvalidEnvironment(pub String);

impl FromStr for Environment {
  type Err = InvalidEnvironment;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "development" => Ok(Environment::Development),
      "staging" => Ok(Environment::Staging),
      "production" => Ok(Environment::Production),
      other => Err(InvalidEnvironment(other.to_string())),
    }
  }
}

// ============================================================================
// Config sections
// ============================================================================

/// Credential capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
  /// Milliseconds to wait for a processor worker to print its credential
  pub timeout_ms: u64,
}

impl Default for CaptureConfig {
  fn default() -> Self {
    Self { timeout_ms: 15_000 }
  }
}

/// Worker launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
  /// Milliseconds to wait between dependent launches so a just-started
  /// worker can bind its listening resources first
  pub settle_delay_ms: u64,
}

impl Default for LaunchConfig {
  fn default() -> Self {
    Self { settle_delay_ms: 500 }
  }
}

/// How a worker process is invoked inside its directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
  /// Interpreter the worker entry runs under
  pub program: String,
  /// Entry script, relative to the worker's directory
  pub entry: String,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      program: "node".to_string(),
      entry: "worker.js".to_string(),
    }
  }
}

/// Terminal emulator settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TerminalConfig {
  /// Emulator probed before the built-in preference list (Linux only)
  pub preferred: Option<String>,
}

/// Launcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
  /// Root directory worker directories are resolved against
  /// (default: the directory chainup runs from)
  pub dev_root: Option<PathBuf>,
  pub capture: CaptureConfig,
  pub launch: LaunchConfig,
  pub runtime: RuntimeConfig,
  pub terminal: TerminalConfig,
}

impl Config {
  /// Load config for a project directory.
  ///
  /// Checks `<dir>/chainup.toml` first, then the user config file; the first
  /// file that parses wins. Missing files fall through silently, malformed
  /// files are reported and skipped.
  pub fn load_for_dir(dir: &Path) -> Self {
    let mut candidates = vec![dir.join(CONFIG_FILE)];
    if let Some(user_dir) = dirs::config_dir() {
      candidates.push(user_dir.join("chainup").join("config.toml"));
    }

    for path in candidates {
      let Ok(text) = std::fs::read_to_string(&path) else {
        continue;
      };
      match toml::from_str::<Config>(&text) {
        Ok(config) => {
          debug!(path = %path.display(), "loaded config");
          return config;
        }
        Err(e) => warn!(path = %path.display(), err = %e, "ignoring malformed config"),
      }
    }

    Self::default()
  }
}
