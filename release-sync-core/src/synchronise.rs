//! High-level pipeline: orchestrates fetch → aggregate → render → write for one repository.
//!
//! # Major Types
//! - [`SynchroniseConfig`](crate::config::SynchroniseConfig): repository, API base and output paths for a run
//! - [`SynchroniseReport`]: what was fetched and written, for logs and tests
//!
//! # Responsibilities
//! - Fail-fast orchestration: a fetch failure returns before any file is opened for writing
//! - Full recomputation on every run; nothing is read back from previous outputs except the README
//!
//! # Error Handling
//! Each failed stage returns [`SyncError`] immediately; the CLI logs and surfaces it.

use std::fmt;

use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::artifacts::{self, ArtifactError, ReadmeUpdate};
use crate::config::SynchroniseConfig;
use crate::contract::ReleaseSource;
use crate::fetch::{fetch_releases, FetchError};
use crate::release_name::NameError;
use crate::render::render_changelog;

#[derive(Debug)]
pub enum SyncError {
    Fetch(FetchError),
    Artifact(ArtifactError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Fetch(e) => write!(f, "fetching releases failed: {e}"),
            SyncError::Artifact(e) => write!(f, "writing artifacts failed: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Fetch(e) => Some(e),
            SyncError::Artifact(e) => Some(e),
        }
    }
}

impl From<FetchError> for SyncError {
    fn from(e: FetchError) -> Self {
        SyncError::Fetch(e)
    }
}

impl From<ArtifactError> for SyncError {
    fn from(e: ArtifactError) -> Self {
        SyncError::Artifact(e)
    }
}

#[derive(Debug)]
pub struct SynchroniseReport {
    pub repository: String,
    pub releases: usize,
    pub days: usize,
    pub preferred: usize,
    pub total_bytes: u64,
    pub total_gib: u64,
    pub readme: ReadmeUpdate,
    pub rejected: Vec<NameError>,
}

pub async fn synchronise<S>(
    config: &SynchroniseConfig,
    source: &S,
) -> Result<SynchroniseReport, SyncError>
where
    S: ReleaseSource + ?Sized,
{
    let repository = config.repository.as_str();
    info!(repository, "[SYNC] Starting release synchronisation");

    // Step 1: Fetch (sorted by name, descending)
    let releases = fetch_releases(source, repository).await.map_err(|e| {
        error!(error = %e, repository, "[SYNC][ERROR] Fetching releases failed, no files written");
        e
    })?;
    info!(count = releases.len(), "[SYNC] Fetched releases");

    // Step 2: Aggregate
    let aggregated = aggregate(repository, &releases);
    let total_gib = aggregated.total_gib();
    info!(
        days = aggregated.days.len(),
        total_bytes = aggregated.total_bytes,
        total_gib,
        rejected = aggregated.rejected.len(),
        "[SYNC] Aggregated releases"
    );

    // Step 3: Render
    let lines = render_changelog(repository, &aggregated.days);

    // Step 4: Write
    let outputs = &config.outputs;
    artifacts::write_changelog(&outputs.changelog, &lines)?;
    artifacts::write_preferred(&outputs.preferred, &aggregated.preferred)?;
    let readme = artifacts::update_readme(&outputs.readme, repository, total_gib)?;

    info!(?readme, "[SYNC] Synchronisation complete");
    Ok(SynchroniseReport {
        repository: repository.to_string(),
        releases: releases.len(),
        days: aggregated.days.len(),
        preferred: aggregated.preferred.len(),
        total_bytes: aggregated.total_bytes,
        total_gib,
        readme,
        rejected: aggregated.rejected,
    })
}
