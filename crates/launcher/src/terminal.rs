//! Terminal-window launching for worker processes.
//!
//! Every worker runs in its own terminal window so it can be watched and
//! stopped interactively. Launches are fire-and-forget: the emulator process
//! is spawned detached and never awaited, so a worker's later behavior never
//! reaches the launcher. The orchestrator sees only the [`TerminalLauncher`]
//! trait; platform differences stay in this module.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::info;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
use tracing::debug;

/// Request to open one worker in a terminal window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
  /// Window title
  pub title: String,
  /// Directory the window changes into before running the command
  pub dir: PathBuf,
  /// Description echoed in the window before the command runs
  pub description: String,
  /// Shell command line that starts the worker
  pub command_line: String,
}

#[derive(Debug, Error)]
pub enum TerminalError {
  #[error("no terminal emulator found; install one of: {0}")]
  NoEmulator(String),
  #[error("failed to launch terminal: {0}")]
  Spawn(#[from] std::io::Error),
}

/// Opens an interactive window running a command in a directory
pub trait TerminalLauncher: Send + Sync {
  fn launch(&self, request: &LaunchRequest) -> Result<(), TerminalError>;
}

/// Linux emulators probed in preference order
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LINUX_EMULATORS: &[&str] = &["gnome-terminal", "xterm", "konsole", "alacritty", "terminator"];

/// Pick the terminal backend for the host platform
#[cfg(target_os = "windows")]
pub fn detect(_preferred: Option<&str>) -> Result<Box<dyn TerminalLauncher>, TerminalError> {
  Ok(Box::new(WindowsTerminal))
}

/// Pick the terminal backend for the host platform
#[cfg(target_os = "macos")]
pub fn detect(_preferred: Option<&str>) -> Result<Box<dyn TerminalLauncher>, TerminalError> {
  Ok(Box::new(MacTerminal))
}

/// Pick the terminal backend for the host platform.
///
/// Probes the known Linux emulators on PATH in preference order, with
/// `preferred` (from config) checked first; no emulator found is an error
/// the CLI treats as fatal.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn detect(preferred: Option<&str>) -> Result<Box<dyn TerminalLauncher>, TerminalError> {
  let candidates = preferred.into_iter().chain(LINUX_EMULATORS.iter().copied());
  for emulator in candidates {
    if executable_exists(emulator) {
      debug!(emulator, "selected terminal emulator");
      return Ok(Box::new(LinuxTerminal {
        emulator: emulator.to_string(),
      }));
    }
  }
  Err(TerminalError::NoEmulator(LINUX_EMULATORS.join(", ")))
}

/// Check PATH for an executable via `which`
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn executable_exists(name: &str) -> bool {
  Command::new("which")
    .arg(name)
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map(|status| status.success())
    .unwrap_or(false)
}

/// Spawn a detached process with all stdio disconnected; the child is never
/// waited on
fn spawn_detached(program: &str, args: &[String]) -> Result<(), TerminalError> {
  Command::new(program)
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()?;
  Ok(())
}

/// Quote for inclusion in a POSIX shell command line
fn shell_quote(s: &str) -> String {
  format!("'{}'", s.replace('\'', r"'\''"))
}

/// The command executed inside a new POSIX window: change into the worker
/// directory, print its description, then run the worker
fn window_command(request: &LaunchRequest) -> String {
  format!(
    "cd {} && echo {} && echo && {}",
    shell_quote(&request.dir.to_string_lossy()),
    shell_quote(&request.description),
    request.command_line
  )
}

// ============================================================================
// Linux
// ============================================================================

pub struct LinuxTerminal {
  emulator: String,
}

impl LinuxTerminal {
  #[cfg(test)]
  fn with_emulator(emulator: &str) -> Self {
    Self {
      emulator: emulator.to_string(),
    }
  }

  fn arguments(&self, request: &LaunchRequest) -> Vec<String> {
    // keep the window open after the worker exits
    let inner = format!("{}; exec bash", window_command(request));
    match self.emulator.as_str() {
      "gnome-terminal" => vec![
        "--title".to_string(),
        request.title.clone(),
        "--".to_string(),
        "bash".to_string(),
        "-c".to_string(),
        inner,
      ],
      "xterm" => vec![
        "-T".to_string(),
        request.title.clone(),
        "-e".to_string(),
        "bash".to_string(),
        "-c".to_string(),
        inner,
      ],
      // terminator takes a single command string
      "terminator" => vec!["-e".to_string(), format!("bash -c {}", shell_quote(&inner))],
      // konsole, alacritty, and anything configured by hand
      _ => vec!["-e".to_string(), "bash".to_string(), "-c".to_string(), inner],
    }
  }
}

impl TerminalLauncher for LinuxTerminal {
  fn launch(&self, request: &LaunchRequest) -> Result<(), TerminalError> {
    info!(title = %request.title, emulator = %self.emulator, "opening worker terminal");
    spawn_detached(&self.emulator, &self.arguments(request))
  }
}

// ============================================================================
// macOS
// ============================================================================

pub struct MacTerminal;

/// Escape for embedding in an AppleScript string literal
fn applescript_escape(s: &str) -> String {
  s.replace('\\', r"\\").replace('"', "\\\"")
}

impl TerminalLauncher for MacTerminal {
  fn launch(&self, request: &LaunchRequest) -> Result<(), TerminalError> {
    info!(title = %request.title, "opening worker terminal via Terminal.app");
    let script = format!(
      "tell application \"Terminal\" to do script \"{}\"",
      applescript_escape(&window_command(request))
    );
    spawn_detached("osascript", &["-e".to_string(), script])
  }
}

// ============================================================================
// Windows
// ============================================================================

pub struct WindowsTerminal;

/// The command executed inside a new cmd window
fn cmd_window_command(request: &LaunchRequest) -> String {
  format!(
    "cd /d \"{}\" && echo {} && echo. && {}",
    request.dir.display(),
    request.description,
    request.command_line
  )
}

impl TerminalLauncher for WindowsTerminal {
  fn launch(&self, request: &LaunchRequest) -> Result<(), TerminalError> {
    info!(title = %request.title, "opening worker terminal via cmd");
    // start treats its first quoted token as the window title; quotes inside
    // the /k command are doubled for cmd
    let escaped = cmd_window_command(request).replace('"', "\"\"");
    spawn_detached(
      "cmd",
      &[
        "/c".to_string(),
        "start".to_string(),
        format!("\"{}\"", request.title),
        "cmd".to_string(),
        "/k".to_string(),
        escaped,
      ],
    )
  }
}
