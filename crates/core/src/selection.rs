//! Indexer selection resolved from the command line.

use crate::catalog::Catalog;
use crate::config::Environment;

/// Which indexers to start and against which environment.
///
/// Built once by the CLI before any process is spawned; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub env: Environment,
  pub all: bool,
  requested: Vec<String>,
}

impl Selection {
  /// `requested` holds catalog-validated indexer ids; duplicates are fine
  pub fn new(env: Environment, all: bool, requested: Vec<String>) -> Self {
    Self { env, all, requested }
  }

  /// True when nothing was selected and `--all` was not passed
  pub fn is_empty(&self) -> bool {
    !self.all && self.requested.is_empty()
  }

  /// Concrete indexer ids, in catalog order regardless of request order
  pub fn indexer_ids<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
    if self.all {
      return catalog.ids().collect();
    }
    catalog.ids().filter(|id| self.requested.iter().any(|r| r == id)).collect()
  }
}
