//! GitHub web links derived from a repository and a release name. No requests are made.

use crate::release_name::{tag_for, ReleaseName};

const GITHUB_URL: &str = "https://github.com";

/// `https://github.com/{repo}/releases/download/{tag}/{tag}.tar`
pub fn asset_download_url(repository: &str, name: &ReleaseName) -> String {
    let tag = name.tag();
    format!("{GITHUB_URL}/{repository}/releases/download/{tag}/{tag}.tar")
}

/// `https://github.com/{repo}/releases/tag/{tag}#assets`
pub fn tag_assets_url(repository: &str, date: &str, variant: &str) -> String {
    format!(
        "{GITHUB_URL}/{repository}/releases/tag/{}#assets",
        tag_for(date, variant)
    )
}
