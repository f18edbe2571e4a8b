//! Id command: compute the urn:sha1: identifier of a local file.

use anyhow::Result;
use std::path::Path;
use urnget_core::digest;

/// Compute and print the URN of the given file.
pub fn run_id(path: &Path) -> Result<()> {
    let digest = digest::sha1_path(path)?;
    println!("{}  {}", digest.to_urn(), path.display());
    Ok(())
}
