//! Renders the month-grouped changelog (`RELEASES.md`) from aggregated day groups.

use std::collections::HashSet;

use crate::aggregate::DayGroup;
use crate::links;

pub const CHANGELOG_TITLE: &str = "# Releases";

/// Produce changelog lines, newest day first, with a `# YYYY-MM` header before the
/// first day of each month.
///
/// Every variant fragment ends in a space, including the last one on a line.
pub fn render_changelog(repository: &str, days: &[DayGroup]) -> Vec<String> {
    let mut lines = vec![CHANGELOG_TITLE.to_string()];
    let mut months_seen: HashSet<String> = HashSet::new();

    for day in days {
        let mut parts = day.date.split('-');
        let year = parts.next().unwrap_or_default();
        let month = parts.next().unwrap_or_default();
        let header = format!("# {year}-{month}");
        if months_seen.insert(header.clone()) {
            lines.push(header);
        }

        let mut line = format!("- {} ", day.date);
        for entry in &day.variants {
            line.push_str(&format!(
                "[{} ({})]({}) ",
                entry.variant,
                entry.human_size,
                links::tag_assets_url(repository, &day.date, &entry.variant)
            ));
        }
        lines.push(line);
    }

    lines
}
