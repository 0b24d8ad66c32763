use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::fetch::GITHUB_API_URL;

pub const DEFAULT_REPOSITORY: &str = "adsblol/globe_history_2024";
pub const DEFAULT_CHANGELOG: &str = "RELEASES.md";
pub const DEFAULT_PREFERRED: &str = "PREFERRED_RELEASES.txt";
pub const DEFAULT_README: &str = "README.md";

/// Everything one synchronisation run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynchroniseConfig {
    /// `owner/name`
    pub repository: String,
    pub api_base: String,
    /// Per-request timeout for the release listing. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub outputs: OutputPaths,
}

/// Where the three artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    pub changelog: PathBuf,
    pub preferred: PathBuf,
    pub readme: PathBuf,
}

impl Default for SynchroniseConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            api_base: GITHUB_API_URL.to_string(),
            request_timeout_secs: None,
            outputs: OutputPaths::default(),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            changelog: PathBuf::from(DEFAULT_CHANGELOG),
            preferred: PathBuf::from(DEFAULT_PREFERRED),
            readme: PathBuf::from(DEFAULT_README),
        }
    }
}

impl OutputPaths {
    /// The default file names placed under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            changelog: dir.join(DEFAULT_CHANGELOG),
            preferred: dir.join(DEFAULT_PREFERRED),
            readme: dir.join(DEFAULT_README),
        }
    }
}

impl SynchroniseConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            repository = %self.repository,
            api_base = %self.api_base,
            changelog = %self.outputs.changelog.display(),
            preferred = %self.outputs.preferred.display(),
            readme = %self.outputs.readme.display(),
            "Loaded SynchroniseConfig"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
