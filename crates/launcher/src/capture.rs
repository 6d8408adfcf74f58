//! Credential capture from a processor worker's output.
//!
//! Spawns the worker with both output streams piped and scans their combined
//! text for the credential line. Exactly one of four terminal conditions
//! resolves an attempt: pattern match, capture deadline, process exit
//! without a match, or spawn failure. The select loop below is the single
//! owner of the attempt, so competing completion sources cannot race.

use chainup_core::{Credential, WorkerCommand};
use regex::Regex;
use std::process::{ExitStatus, Stdio};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, trace};

/// Credential line printed by processor workers during startup
static CREDENTIAL_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)rpc public key:\s*([0-9a-f]{64})").expect("credential pattern is valid"));

/// Combined-output scan window; output older than this is dropped. The
/// credential line is scanned against the window rather than the latest
/// chunk alone, so a token split across two chunks still matches.
const SCAN_WINDOW: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum CaptureError {
  /// The worker process could not be spawned at all
  #[error("failed to spawn worker: {0}")]
  Spawn(std::io::Error),
  /// No credential appeared within the capture deadline
  #[error("credential not found within {0}ms")]
  Timeout(u64),
  /// The worker exited before printing a credential
  #[error("worker exited without printing a credential ({status})")]
  ExitedWithoutMatch { status: ExitStatus },
  /// Reading the worker's output failed
  #[error("failed to read worker output: {0}")]
  Io(#[from] std::io::Error),
}

/// Run `cmd` and wait for it to print its credential.
///
/// The worker is killed as soon as the attempt resolves, whether a
/// credential was found or the deadline expired; a worker that exits on its
/// own resolves the attempt immediately rather than holding it open until
/// the deadline.
pub async fn capture_credential(cmd: &WorkerCommand, timeout: Duration) -> Result<Credential, CaptureError> {
  let timeout_ms = timeout.as_millis() as u64;

  debug!(program = %cmd.program, dir = %cmd.dir.display(), "spawning worker for credential capture");

  let mut child = Command::new(&cmd.program)
    .args(&cmd.args)
    .current_dir(&cmd.dir)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(CaptureError::Spawn)?;

  let mut stdout = child
    .stdout
    .take()
    .ok_or_else(|| std::io::Error::other("stdout not piped"))?;
  let mut stderr = child
    .stderr
    .take()
    .ok_or_else(|| std::io::Error::other("stderr not piped"))?;

  let deadline = tokio::time::Instant::now() + timeout;
  let mut window = String::new();
  let mut out_buf = [0u8; 4096];
  let mut err_buf = [0u8; 4096];
  let mut out_open = true;
  let mut err_open = true;

  while out_open || err_open {
    let chunk = tokio::select! {
      read = stdout.read(&mut out_buf), if out_open => match read? {
        0 => {
          out_open = false;
          None
        }
        n => Some(String::from_utf8_lossy(&out_buf[..n]).into_owned()),
      },
      read = stderr.read(&mut err_buf), if err_open => match read? {
        0 => {
          err_open = false;
          None
        }
        n => Some(String::from_utf8_lossy(&err_buf[..n]).into_owned()),
      },
      _ = tokio::time::sleep_until(deadline) => {
        kill(&mut child).await;
        return Err(CaptureError::Timeout(timeout_ms));
      }
    };

    if let Some(chunk) = chunk {
      trace!(len = chunk.len(), "worker output chunk");
      push_window(&mut window, &chunk);
      if let Some(credential) = scan(&window) {
        kill(&mut child).await;
        return Ok(credential);
      }
    }
  }

  // Both streams are closed. A worker that closes its pipes but keeps
  // running stays bounded by the same deadline.
  let status = tokio::select! {
    status = child.wait() => status?,
    _ = tokio::time::sleep_until(deadline) => {
      kill(&mut child).await;
      return Err(CaptureError::Timeout(timeout_ms));
    }
  };

  match scan(&window) {
    Some(credential) => Ok(credential),
    None => Err(CaptureError::ExitedWithoutMatch { status }),
  }
}

/// Append a chunk, keeping the window within `SCAN_WINDOW` bytes
fn push_window(window: &mut String, chunk: &str) {
  window.push_str(chunk);
  if window.len() > SCAN_WINDOW {
    let mut cut = window.len() - SCAN_WINDOW;
    while !window.is_char_boundary(cut) {
      cut += 1;
    }
    window.drain(..cut);
  }
}

fn scan(window: &str) -> Option<Credential> {
  let caps = CREDENTIAL_PATTERN.captures(window)?;
  Credential::parse(&caps[1]).ok()
}

async fn kill(child: &mut Child) {
  if let Err(e) = child.kill().await {
    debug!(err = %e, "failed to kill worker after capture resolved");
  }
}
