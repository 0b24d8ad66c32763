//! # contract: data shared between pipeline stages, and the release source seam
//!
//! This module defines the records returned by a release listing API and the
//! single trait ([`ReleaseSource`]) the pipeline uses to obtain them.
//!
//! ## Interface & Extensibility
//! - Implement [`ReleaseSource`] for a new listing backend (a mirror, a fixture file, etc).
//! - The only production implementor is [`crate::fetch::GitHubReleaseSource`].
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can build a `MockReleaseSource`
//!   that returns a fixed release list without any network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::fetch::FetchError;

/// A single downloadable file attached to a release. Does not contain all API fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl Asset {
    /// Only `.tar` archives count towards release sizes.
    pub fn is_tar(&self) -> bool {
        self.name.ends_with(".tar")
    }
}

/// A release as listed by the remote API. Does not contain all API fields.
///
/// See the GitHub [docs](https://docs.github.com/en/rest/releases/releases#list-releases) for the full payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// `vYYYY.MM.DD-<variant>`. The API reports `null` for releases without a title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// The release name, with a missing name treated as empty.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Sum of the sizes of all `.tar` assets; every other asset is ignored.
    pub fn tar_bytes(&self) -> u64 {
        self.assets
            .iter()
            .filter(|asset| asset.is_tar())
            .map(|asset| asset.size)
            .sum()
    }
}

/// Trait for listing every release of a repository.
///
/// Implementors must return the complete listing (all pages), in any order;
/// ordering is applied by [`crate::fetch::fetch_releases`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// List all releases for `repository` (`owner/name`).
    async fn list_releases(&self, repository: &str) -> Result<Vec<Release>, FetchError>;
}
