//! CLI for the urnget content-addressed fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use urnget_core::config::{self, UrngetConfig};
use urnget_core::mirrors::MirrorSet;
use urnget_core::Fetcher;

use commands::{run_checkout, run_id, run_mirrors};

/// Top-level CLI for the urnget fetcher.
#[derive(Debug, Parser)]
#[command(name = "urnget")]
#[command(about = "urnget: fetch content-addressed URNs from untrusted mirrors", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URN from the configured mirrors and install it at a path.
    Checkout {
        /// Content URN (urn:sha1:..., bare base-32, or hex).
        urn: String,
        /// Destination file path.
        dest: String,
    },

    /// Compute and print the urn:sha1: identifier of a local file.
    Id {
        /// Path to the file.
        path: String,
    },

    /// Print the configured mirror list after normalization.
    Mirrors,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Checkout { urn, dest } => {
                let fetcher = Fetcher::with_options(load_mirrors(&cfg)?, cfg.download_options());
                run_checkout(&fetcher, &urn, Path::new(&dest))?;
            }
            CliCommand::Id { path } => run_id(Path::new(&path))?,
            CliCommand::Mirrors => run_mirrors(&load_mirrors(&cfg)?),
        }
        Ok(())
    }
}

/// Standard mirror lists (cwd ancestors + home) merged with config extras.
fn load_mirrors(cfg: &UrngetConfig) -> Result<MirrorSet> {
    let cwd = std::env::current_dir()?;
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut mirrors = MirrorSet::load_standard(&cwd, home.as_deref());
    for raw in &cfg.mirrors {
        mirrors.add(raw);
    }
    Ok(mirrors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_checkout() {
        let cli = Cli::parse_from(["urnget", "checkout", "urn:sha1:ABC", "out.bin"]);
        match cli.command {
            CliCommand::Checkout { urn, dest } => {
                assert_eq!(urn, "urn:sha1:ABC");
                assert_eq!(dest, "out.bin");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_id_and_mirrors() {
        assert!(matches!(
            Cli::parse_from(["urnget", "id", "f.bin"]).command,
            CliCommand::Id { .. }
        ));
        assert!(matches!(
            Cli::parse_from(["urnget", "mirrors"]).command,
            CliCommand::Mirrors
        ));
    }
}
