//! chainup - local development launcher for the indexer worker fleet
//!
//! Captures each processor worker's RPC credential from its startup output,
//! then opens every selected worker in its own terminal window in dependency
//! order.

use anyhow::Result;
use chainup_core::{Catalog, Config};
use launcher::orchestrator::Orchestrator;
use launcher::terminal;
use std::path::PathBuf;
use std::sync::Arc;

mod args;
mod logging;
mod summary;

use args::{ResolveError, Resolved, resolve};

#[tokio::main]
async fn main() -> Result<()> {
  logging::init_cli_logging();

  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  let config = Config::load_for_dir(&cwd);

  // indexer ids do not depend on the dev root, so resolution can use a
  // provisionally rooted catalog before --root is known
  let run = match resolve(&Catalog::builtin(&cwd), std::env::args().collect()) {
    Ok(Resolved::Help(text)) => {
      println!("{text}");
      return Ok(());
    }
    Ok(Resolved::Run(run)) => run,
    Err(ResolveError::Usage(message)) => {
      eprintln!("{message}");
      std::process::exit(1);
    }
    Err(ResolveError::NoSelection { available }) => {
      eprintln!("Error: no indexers selected. Use --all or pass individual indexer flags.");
      eprintln!("Available indexers: {available}");
      eprintln!("Use --help for usage information.");
      std::process::exit(1);
    }
  };

  let dev_root = run.root.clone().or_else(|| config.dev_root.clone()).unwrap_or(cwd);
  let catalog = Catalog::builtin(&dev_root);

  let terminal = match terminal::detect(config.terminal.preferred.as_deref()) {
    Ok(terminal) => Arc::from(terminal),
    Err(e) => {
      eprintln!("Error: {e}");
      std::process::exit(1);
    }
  };

  println!("Starting chainup development environment...");
  println!("Environment: {}", run.selection.env);
  println!("Selected indexers: {}", run.selection.indexer_ids(&catalog).join(", "));
  println!();

  let env = run.selection.env;
  let orchestrator = Orchestrator::new(catalog, config, env, terminal);
  let report = orchestrator.run(&run.selection).await;

  summary::print_report(&report);
  Ok(())
}
