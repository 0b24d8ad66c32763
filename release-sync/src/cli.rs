//! This module implements the CLI interface for release-sync: command parsing,
//! the async entrypoint, and user-visible logging of the outcome.
//!
//! All pipeline logic (fetching, aggregation, rendering, writing) lives in the
//! [`release-sync-core`] crate. This module only loads config and wires a
//! [`GitHubReleaseSource`] into [`synchronise`].
//!
//! ## How To Use
//! - For command-line users: run `release-sync sync` in the repository that holds
//!   `RELEASES.md`, `PREFERRED_RELEASES.txt` and `README.md`, optionally with `--config`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! [`release-sync-core`]: ../../release-sync-core/

use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use release_sync_core::fetch::GitHubReleaseSource;
use release_sync_core::synchronise::synchronise;
use std::path::PathBuf;

/// CLI for release-sync: regenerate release artifacts from GitHub releases.
#[derive(Parser)]
#[clap(
    name = "release-sync",
    version,
    about = "Regenerate RELEASES.md, PREFERRED_RELEASES.txt and the README size line from GitHub releases"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all releases and rewrite the changelog, preferred list and README
    Sync {
        /// Optional YAML config file; built-in defaults are used without it
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "sync", "Starting synchronisation process");

            let source = GitHubReleaseSource::new(&config.api_base, config.request_timeout())
                .context("Failed to construct release source")?;

            match synchronise(&config, &source).await {
                Ok(report) => {
                    tracing::info!(
                        command = "sync",
                        releases = report.releases,
                        rejected = report.rejected.len(),
                        total_gib = report.total_gib,
                        ?report,
                        "Synchronisation complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
