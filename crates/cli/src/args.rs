//! Command-line resolution against the worker catalog.
//!
//! The fixed surface (`--all`, `--env`, `--root`, `--help`) is a clap
//! command; one boolean flag per catalog indexer is added at runtime so the
//! help output lists every indexer with its description. Unknown `--flags`
//! are filtered out with a warning before clap parses, keeping them
//! non-fatal.

use chainup_core::{Catalog, Environment, Selection};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// A parsed, validated command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
  pub selection: Selection,
  /// Dev root override from `--root`
  pub root: Option<PathBuf>,
}

/// How a command line resolves
#[derive(Debug)]
pub enum Resolved {
  /// Print this text and exit 0
  Help(String),
  Run(RunArgs),
}

/// Fatal resolution failures; both exit 1 before any worker spawns
#[derive(Debug)]
pub enum ResolveError {
  /// Malformed arguments, including an invalid `--env` value; the message
  /// is clap's rendering and names the offending value and the valid set
  Usage(String),
  /// Nothing selected and `--all` absent
  NoSelection { available: String },
}

/// Resolve `argv` (including the program name) into a selection.
pub fn resolve(catalog: &Catalog, argv: Vec<String>) -> Result<Resolved, ResolveError> {
  let argv = filter_unknown(catalog, argv);

  let matches = match build_command(catalog).try_get_matches_from(argv) {
    Ok(matches) => matches,
    Err(err) if err.kind() == ErrorKind::DisplayHelp => return Ok(Resolved::Help(err.to_string())),
    Err(err) => return Err(ResolveError::Usage(err.to_string())),
  };

  // the value parser has already vetted the value
  let env = matches
    .get_one::<String>("env")
    .map(|s| Environment::from_str(s))
    .transpose()
    .map_err(|e| ResolveError::Usage(e.to_string()))?
    .unwrap_or_default();

  let all = matches.get_flag("all");
  let requested: Vec<String> = catalog.ids().filter(|id| matches.get_flag(id)).map(str::to_string).collect();

  let selection = Selection::new(env, all, requested);
  if selection.is_empty() {
    return Err(ResolveError::NoSelection {
      available: catalog.ids().collect::<Vec<_>>().join(", "),
    });
  }

  Ok(Resolved::Run(RunArgs {
    selection,
    root: matches.get_one::<String>("root").map(PathBuf::from),
  }))
}

fn build_command(catalog: &Catalog) -> Command {
  let mut command = Command::new("chainup")
    .about("Start the chainup development environment")
    .arg(
      Arg::new("all")
        .long("all")
        .action(ArgAction::SetTrue)
        .help("Start all indexers"),
    )
    .arg(
      Arg::new("env")
        .long("env")
        .value_name("ENV")
        .value_parser(["development", "staging", "production"])
        .default_value("development")
        .help("Environment workers start against"),
    )
    .arg(
      Arg::new("root")
        .long("root")
        .value_name("DIR")
        .help("Dev root the worker directories live under (default: current directory)"),
    )
    .after_help(
      "Core workers (data shard, ORK, HTTP) always start regardless of indexer selection.\n\
       Each worker opens in its own terminal window; close the window to stop that worker.",
    );

  for indexer in catalog.indexers() {
    command = command.arg(
      Arg::new(indexer.id.clone())
        .long(indexer.id.clone())
        .action(ArgAction::SetTrue)
        .help(format!("Start the {} indexer (processor + API)", indexer.name)),
    );
  }

  command
}

/// Drop tokens clap would reject: unknown `--flags` (with a warning, they
/// are non-fatal) and bare words (ignored, as the launcher always has).
/// Values belonging to `--env`/`--root` are kept with their flag.
fn filter_unknown(catalog: &Catalog, argv: Vec<String>) -> Vec<String> {
  let mut kept = Vec::with_capacity(argv.len());
  let mut args = argv.into_iter();
  if let Some(program) = args.next() {
    kept.push(program);
  }

  let mut expect_value = false;
  for arg in args {
    if expect_value {
      kept.push(arg);
      expect_value = false;
    } else if arg == "--env" || arg == "--root" {
      expect_value = true;
      kept.push(arg);
    } else if arg == "--all"
      || arg == "--help"
      || arg == "-h"
      || arg.starts_with("--env=")
      || arg.starts_with("--root=")
    {
      kept.push(arg);
    } else if let Some(id) = arg.strip_prefix("--") {
      if catalog.contains(id) {
        kept.push(arg);
      } else {
        warn!(flag = %arg, "unknown indexer option ignored");
      }
    }
  }

  kept
}
