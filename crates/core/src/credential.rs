//! Credential printed by a processor worker once its RPC endpoint is ready.

use std::fmt;
use thiserror::Error;

/// A 64-character hex token scoped to one processor launch; passed to the
/// paired API worker as `--proc-rpc` and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
  #[error("credential must be {expected} hex characters, got {got}", expected = Credential::LEN)]
  Length { got: usize },
  #[error("credential contains non-hex characters")]
  NotHex,
}

impl Credential {
  pub const LEN: usize = 64;

  pub fn parse(s: &str) -> Result<Self, CredentialError> {
    if s.len() != Self::LEN {
      return Err(CredentialError::Length { got: s.len() });
    }
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(CredentialError::NotHex);
    }
    Ok(Self(s.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// First 16 characters, for log lines
  pub fn preview(&self) -> &str {
    &self.0[..16]
  }
}

impl fmt::Display for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
