//! Groups sorted releases by day, picks the preferred (largest) variant per day and
//! sums the cumulative `.tar` size.
//!
//! Input must already be sorted by name descending (see [`crate::fetch::fetch_releases`]).
//! Every sequence produced here keeps first-seen order from that single pass, so the
//! first day group is the newest day and variants inside a day stay name-descending.

use tracing::{debug, warn};

use crate::contract::Release;
use crate::links;
use crate::release_name::{NameError, ReleaseName};

/// One variant published on a day, with its `.tar` size already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSize {
    pub variant: String,
    /// `"<N> MB"`, truncated mebibytes.
    pub human_size: String,
}

/// All variants published on one date, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    /// `YYYY-MM-DD`
    pub date: String,
    pub variants: Vec<VariantSize>,
}

/// The largest variant of a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredRelease {
    pub date: String,
    /// Direct download link of the variant's `.tar` asset.
    pub link: String,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub days: Vec<DayGroup>,
    pub preferred: Vec<PreferredRelease>,
    /// Sum of `.tar` sizes over every release, rejected names included.
    pub total_bytes: u64,
    /// Releases left out of days and preferred because their name could not be parsed.
    pub rejected: Vec<NameError>,
}

impl Aggregate {
    pub fn total_gib(&self) -> u64 {
        bytes_to_gib(self.total_bytes)
    }
}

/// `"<N> MB"` where N is `bytes` in whole mebibytes (truncated).
pub fn human_size(bytes: u64) -> String {
    format!("{} MB", bytes / 1024 / 1024)
}

pub fn bytes_to_gib(bytes: u64) -> u64 {
    bytes / 1024 / 1024 / 1024
}

pub fn aggregate(repository: &str, releases: &[Release]) -> Aggregate {
    let mut out = Aggregate::default();

    for release in releases {
        // Storage counts even when the name is unusable for grouping.
        let total = release.tar_bytes();
        out.total_bytes += total;

        let name = match ReleaseName::parse(release.name()) {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    error = %e,
                    tag = %release.tag_name,
                    bytes = total,
                    "[AGGREGATE] Skipping release with unexpected name"
                );
                out.rejected.push(e);
                continue;
            }
        };

        debug!(date = %name.date, variant = %name.variant, bytes = total, "[AGGREGATE] Counted release");

        let entry = VariantSize {
            variant: name.variant.clone(),
            human_size: human_size(total),
        };
        let day = out.days.iter().position(|day| day.date == name.date);
        match day {
            Some(i) => out.days[i].variants.push(entry),
            None => out.days.push(DayGroup {
                date: name.date.clone(),
                variants: vec![entry],
            }),
        }

        let link = links::asset_download_url(repository, &name);
        let current = out.preferred.iter().position(|p| p.date == name.date);
        match current {
            // Strictly greater: on a tie the earlier (name-greater) variant stays.
            Some(i) if total > out.preferred[i].total_bytes => {
                out.preferred[i].link = link;
                out.preferred[i].total_bytes = total;
            }
            Some(_) => {}
            None => out.preferred.push(PreferredRelease {
                date: name.date,
                link,
                total_bytes: total,
            }),
        }
    }

    out
}
