//! Checkout command: fetch a URN and install it at a destination path.

use anyhow::Result;
use std::path::Path;
use urnget_core::Fetcher;

/// Run a checkout. Failures print the per-mirror reasons verbatim, one per
/// line, and exit with a class-specific code (1 = mirrors exhausted or
/// none configured, 2 = malformed URN, 3 = local I/O).
pub fn run_checkout(fetcher: &Fetcher, urn: &str, dest: &Path) -> Result<()> {
    if let Err(err) = fetcher.checkout(urn, dest) {
        eprintln!("urnget: {err}");
        std::process::exit(err.exit_code());
    }
    println!("{} -> {}", urn, dest.display());
    Ok(())
}
