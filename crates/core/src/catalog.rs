//! Static worker catalog for the chainup development environment.
//!
//! Path structure: the dev root holds the core worker directories, with the
//! per-chain indexer workers one level down under `indexers/`. The catalog is
//! built once at startup and passed around read-only; nothing mutates it
//! after construction.

use std::path::{Path, PathBuf};

/// One launchable worker process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerDescriptor {
  /// Directory the worker runs in
  pub dir: PathBuf,
  /// Worker type, passed as `--wtype`
  pub wtype: String,
  /// Placement tag, passed as `--rack` when present
  pub rack: Option<String>,
  /// Chain identifier, passed as `--chain` when present
  pub chain: Option<String>,
  /// Listen port, passed as `--port` when present
  pub port: Option<u16>,
  /// Terminal window title
  pub title: String,
  /// Description echoed in the worker's window before it starts
  pub description: String,
}

/// A processor/API worker pair indexing one chain or token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexer {
  pub id: String,
  pub name: String,
  pub proc: WorkerDescriptor,
  pub api: WorkerDescriptor,
}

/// Core workers started on every run, after the indexers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreWorkers {
  pub data_shard_proc: WorkerDescriptor,
  pub data_shard_api: WorkerDescriptor,
  pub ork: WorkerDescriptor,
  pub http: WorkerDescriptor,
}

/// The full worker catalog: every indexer pair plus the core workers
#[derive(Debug, Clone)]
pub struct Catalog {
  indexers: Vec<Indexer>,
  core: CoreWorkers,
}

// ============================================================================
// Indexer families
// ============================================================================

/// Worker family an indexer belongs to; determines its directory, worker
/// types, and description wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
  Evm,
  Erc20,
  Btc,
  Ton,
  Jetton,
  Solana,
  Spl,
  Tron,
  Trc20,
  Spark,
}

impl Family {
  /// Worker directory, relative to the dev root
  fn dir(&self) -> &'static str {
    match self {
      Family::Evm | Family::Erc20 => "indexers/idx-wrk-evm",
      Family::Btc => "indexers/idx-wrk-btc",
      Family::Ton | Family::Jetton => "indexers/idx-wrk-ton",
      Family::Solana | Family::Spl => "indexers/idx-wrk-solana",
      Family::Tron | Family::Trc20 => "indexers/idx-wrk-tron",
      Family::Spark => "indexers/idx-wrk-spark",
    }
  }

  /// Stem of the `--wtype` identifier (`<stem>-indexer-proc` / `-api`)
  fn stem(&self) -> &'static str {
    match self {
      Family::Evm => "evm",
      Family::Erc20 => "erc20",
      Family::Btc => "btc",
      Family::Ton => "ton",
      Family::Jetton => "jetton",
      Family::Solana => "solana",
      Family::Spl => "spl",
      Family::Tron => "tron",
      Family::Trc20 => "trc20",
      Family::Spark => "spark",
    }
  }

  /// Family label used in descriptions
  fn label(&self) -> &'static str {
    match self {
      Family::Evm => "EVM",
      Family::Erc20 => "ERC20",
      Family::Btc => "Bitcoin",
      Family::Ton => "TON",
      Family::Jetton => "Jetton",
      Family::Solana => "Solana",
      Family::Spl => "SPL",
      Family::Tron => "Tron",
      Family::Trc20 => "TRC20",
      Family::Spark => "Spark",
    }
  }

  /// What the processor indexes, for descriptions
  fn subject(&self) -> &'static str {
    match self {
      Family::Evm => "EVM chain blocks and transactions",
      Family::Erc20 => "ERC20 token transfers",
      Family::Btc => "Bitcoin blocks and transactions",
      Family::Ton => "TON chain blocks and transactions",
      Family::Jetton => "Jetton token transfers",
      Family::Solana => "Solana blocks and transactions",
      Family::Spl => "SPL token transfers",
      Family::Tron => "Tron blocks and transactions",
      Family::Trc20 => "TRC20 token transfers",
      Family::Spark => "Spark chain blocks and transactions",
    }
  }
}

/// Indexer table: id, display name, family, rack slot, chain identifier.
/// Rack slots are assigned once and never reused between indexers.
const INDEXERS: &[(&str, &str, Family, u32, &str)] = &[
  // EVM indexers
  ("eth", "ETH", Family::Evm, 0, "eth"),
  ("usdt-eth", "USDT-ETH", Family::Erc20, 1, "usdt-eth"),
  ("xaut-eth", "XAUT-ETH", Family::Erc20, 2, "xaut-eth"),
  ("usdt-arb", "USDT-ARB", Family::Erc20, 12, "usdt-arb"),
  ("usdt-pol", "USDT-POL", Family::Erc20, 13, "usdt-pol"),
  ("usdt-plasma", "USDT-PLASMA", Family::Erc20, 14, "usdt-plasma"),
  ("xaut-plasma", "XAUT-PLASMA", Family::Erc20, 15, "xaut-plasma"),
  ("sepolia", "SEPOLIA", Family::Evm, 16, "sepolia"),
  ("usdt-sepolia", "USDT-SEPOLIA", Family::Erc20, 17, "usdt-sepolia"),
  ("erc20", "ERC20-TEMPLATE", Family::Erc20, 18, "erc20"),
  // Bitcoin indexer
  ("btc", "BTC", Family::Btc, 3, "bitcoin"),
  // TON indexers
  ("ton", "TON", Family::Ton, 4, "ton"),
  ("usdt-ton", "USDT-TON", Family::Jetton, 5, "usdt-ton"),
  ("xaut-ton", "XAUT-TON", Family::Jetton, 6, "xaut-ton"),
  ("jetton", "JETTON-TEMPLATE", Family::Jetton, 19, "jetton"),
  // Solana indexers
  ("solana", "SOLANA", Family::Solana, 7, "solana"),
  ("usdt-sol", "USDT-SOL", Family::Spl, 8, "usdt-sol"),
  ("spl", "SPL-TEMPLATE", Family::Spl, 20, "spl"),
  // Tron indexers
  ("tron", "TRON", Family::Tron, 9, "tron"),
  ("usdt-tron", "USDT-TRON", Family::Trc20, 10, "usdt-tron"),
  // Spark indexer
  ("spark", "SPARK", Family::Spark, 11, "spark"),
];

fn indexer(dev_root: &Path, id: &str, name: &str, family: Family, rack_slot: u32, chain: &str) -> Indexer {
  let dir = dev_root.join(family.dir());
  let proc = WorkerDescriptor {
    dir: dir.clone(),
    wtype: format!("{}-indexer-proc", family.stem()),
    rack: Some(format!("w-{rack_slot}")),
    chain: Some(chain.to_string()),
    port: None,
    title: format!("{name} Indexer Processor"),
    description: format!("{} Indexer Processor - processes {} ({name})", family.label(), family.subject()),
  };
  let api = WorkerDescriptor {
    dir,
    wtype: format!("{}-indexer-api", family.stem()),
    rack: Some(format!("w-{rack_slot}-0")),
    chain: Some(chain.to_string()),
    port: None,
    title: format!("{name} Indexer API"),
    description: format!("{} Indexer API - serves indexed data ({name})", family.label()),
  };
  Indexer {
    id: id.to_string(),
    name: name.to_string(),
    proc,
    api,
  }
}

fn core_workers(dev_root: &Path) -> CoreWorkers {
  let shard_dir = dev_root.join("data-shard-wrk");
  CoreWorkers {
    data_shard_proc: WorkerDescriptor {
      dir: shard_dir.clone(),
      wtype: "data-shard-proc".to_string(),
      rack: Some("shard-0-0".to_string()),
      chain: None,
      port: None,
      title: "Data Shard Processor".to_string(),
      description: "Data Shard Processor - processes data shard operations".to_string(),
    },
    data_shard_api: WorkerDescriptor {
      dir: shard_dir,
      wtype: "data-shard-api".to_string(),
      rack: Some("shard-0-0".to_string()),
      chain: None,
      port: None,
      title: "Data Shard API Worker".to_string(),
      description: "Data Shard API Worker - provides API access to data shard operations".to_string(),
    },
    ork: WorkerDescriptor {
      dir: dev_root.join("ork-wrk"),
      wtype: "ork-api".to_string(),
      rack: Some("ork-0".to_string()),
      chain: None,
      port: None,
      title: "ORK API Worker".to_string(),
      description: "ORK API Worker - manages ordering and replication keys".to_string(),
    },
    http: WorkerDescriptor {
      dir: dev_root.join("app-node"),
      wtype: "node-http".to_string(),
      rack: None,
      chain: None,
      port: Some(3000),
      title: "HTTP Node Worker".to_string(),
      description: "HTTP Node Worker - provides HTTP API endpoints (requires Redis on port 6379)".to_string(),
    },
  }
}

impl Catalog {
  /// Build the full built-in catalog rooted at `dev_root`
  pub fn builtin(dev_root: &Path) -> Self {
    let indexers = INDEXERS
      .iter()
      .map(|(id, name, family, rack_slot, chain)| indexer(dev_root, id, name, *family, *rack_slot, chain))
      .collect();
    Self {
      indexers,
      core: core_workers(dev_root),
    }
  }

  /// Build a catalog from explicit parts (primarily for tests)
  pub fn new(indexers: Vec<Indexer>, core: CoreWorkers) -> Self {
    Self { indexers, core }
  }

  /// All indexers, in catalog order
  pub fn indexers(&self) -> &[Indexer] {
    &self.indexers
  }

  /// Look up one indexer by id
  pub fn indexer(&self, id: &str) -> Option<&Indexer> {
    self.indexers.iter().find(|ix| ix.id == id)
  }

  /// Whether `id` names a catalog indexer
  pub fn contains(&self, id: &str) -> bool {
    self.indexer(id).is_some()
  }

  /// Indexer ids in catalog order
  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.indexers.iter().map(|ix| ix.id.as_str())
  }

  pub fn core(&self) -> &CoreWorkers {
    &self.core
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn catalog() -> Catalog {
    Catalog::builtin(Path::new("/dev-root"))
  }

  #[test]
  fn test_catalog_has_all_indexers() {
    assert_eq!(catalog().indexers().len(), 21);
  }

  #[test]
  fn test_indexer_ids_are_unique() {
    let catalog = catalog();
    let ids: HashSet<&str> = catalog.ids().collect();
    assert_eq!(ids.len(), catalog.indexers().len());
  }

  #[test]
  fn test_rack_slots_are_unique() {
    let catalog = catalog();
    let racks: HashSet<&str> = catalog
      .indexers()
      .iter()
      .filter_map(|ix| ix.proc.rack.as_deref())
      .collect();
    assert_eq!(racks.len(), catalog.indexers().len());
  }

  #[test]
  fn test_lookup_by_id() {
    let catalog = catalog();
    let eth = catalog.indexer("eth").unwrap();
    assert_eq!(eth.name, "ETH");
    assert_eq!(eth.proc.wtype, "evm-indexer-proc");
    assert_eq!(eth.api.wtype, "evm-indexer-api");
    assert_eq!(eth.proc.chain.as_deref(), Some("eth"));
    assert!(catalog.indexer("doge").is_none());
  }

  #[test]
  fn test_btc_uses_bitcoin_chain_id() {
    let btc = catalog().indexer("btc").unwrap().clone();
    assert_eq!(btc.proc.chain.as_deref(), Some("bitcoin"));
    assert!(btc.proc.dir.ends_with("indexers/idx-wrk-btc"));
  }

  #[test]
  fn test_api_rack_extends_proc_rack() {
    for ix in catalog().indexers() {
      let proc_rack = ix.proc.rack.as_deref().unwrap();
      let api_rack = ix.api.rack.as_deref().unwrap();
      assert_eq!(api_rack, format!("{proc_rack}-0"));
    }
  }

  #[test]
  fn test_dirs_resolve_under_dev_root() {
    for ix in catalog().indexers() {
      assert!(ix.proc.dir.starts_with("/dev-root/indexers"));
      assert_eq!(ix.proc.dir, ix.api.dir);
    }
  }

  #[test]
  fn test_core_workers() {
    let catalog = catalog();
    let core = catalog.core();
    assert_eq!(core.data_shard_proc.wtype, "data-shard-proc");
    assert_eq!(core.data_shard_proc.rack.as_deref(), Some("shard-0-0"));
    assert_eq!(core.data_shard_api.dir, core.data_shard_proc.dir);
    assert_eq!(core.http.port, Some(3000));
    assert!(core.http.rack.is_none());
    assert!(core.ork.chain.is_none());
  }
}
