//! Final run summary printed after all launch attempts have been issued.
//!
//! Marker convention: `✓` started, `⚠` degraded but continuing, `✗` failed.

use launcher::orchestrator::StartupReport;

pub fn print_report(report: &StartupReport) {
  println!();
  for outcome in &report.indexers {
    if outcome.api_launched {
      println!("✓ {} indexer started (processor + API)", outcome.name);
    } else {
      println!("✗ {} credential capture failed; processor started alone", outcome.name);
      println!("⚠ Start the {} API worker manually once its processor is up", outcome.name);
    }
  }

  if report.data_shard_api_launched {
    println!("✓ Data shard started (processor + API)");
  } else {
    println!("⚠ Data shard API skipped - no credential captured");
  }
  println!("✓ ORK and HTTP workers started");

  println!();
  println!("✓ All launch attempts issued");
  println!();
  println!("NOTES:");
  println!("1. Indexers start first so their topics are published before the data shard looks them up");
  println!("2. The HTTP worker expects Redis on port 6379");
  println!("3. Each worker runs in its own terminal window; close the window to stop that worker");
  println!("4. Topic lookup errors are normal until every indexer finishes starting up");
}
