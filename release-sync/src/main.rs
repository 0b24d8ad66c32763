use anyhow::Result;
use clap::Parser;
use release_sync::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // RELEASE_SYNC_API_BASE may come from .env
    dotenvy::dotenv().ok();

    // RUST_LOG controls verbosity; [FETCH]/[AGGREGATE] debug events need RUST_LOG=debug.
    tracing_subscriber::fmt::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "release-sync starting");

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("release-sync finished, artifacts are up to date"),
        Err(e) => tracing::error!(error = %e, "release-sync failed"),
    }
    result
}
