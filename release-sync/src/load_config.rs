//! `load_config` module: loads an optional YAML config file into the core `SynchroniseConfig`.
//!
//! # Responsibilities
//! - Without a file, return the built-in defaults (repository `adsblol/globe_history_2024`,
//!   `RELEASES.md`, `PREFERRED_RELEASES.txt`, `README.md` in the working directory)
//! - With a file, parse it; every key is optional and falls back to its default
//! - Apply the `RELEASE_SYNC_API_BASE` environment override
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.

use anyhow::Result;
use release_sync_core::config::SynchroniseConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const API_BASE_ENV: &str = "RELEASE_SYNC_API_BASE";

pub fn load_config(path: Option<&Path>) -> Result<SynchroniseConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            info!("No config file given, using built-in defaults");
            SynchroniseConfig::default()
        }
    };

    if let Ok(api_base) = std::env::var(API_BASE_ENV) {
        if !api_base.trim().is_empty() {
            info!(api_base = %api_base, "{API_BASE_ENV} found in env, overriding api_base");
            config.api_base = api_base;
        }
    }

    if !is_owner_and_name(&config.repository) {
        error!(repository = %config.repository, "repository must have the form owner/name");
        anyhow::bail!(
            "repository must have the form owner/name, got {:?}",
            config.repository
        );
    }

    config.trace_loaded();
    Ok(config)
}

/// `owner/name` with both halves non-empty and no further `/`.
fn is_owner_and_name(repository: &str) -> bool {
    match repository.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

fn read_config_file(path: &Path) -> Result<SynchroniseConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let config_content = match fs::read_to_string(path) {
        Ok(content) => {
            info!(config_path = ?path, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is a valid "all defaults" config
    if config_content.trim().is_empty() {
        return Ok(SynchroniseConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
