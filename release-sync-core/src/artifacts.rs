//! Artifact writer: persists the changelog, the preferred-release list and the README size line.
//!
//! Every write is a full overwrite of the target file, so rerunning against an unchanged
//! release listing reproduces byte-identical files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use tracing::{error, info, warn};

use crate::aggregate::PreferredRelease;

#[derive(Debug)]
pub enum ArtifactError {
    Io { path: PathBuf, source: std::io::Error },
    Pattern(regex::Error),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            ArtifactError::Pattern(e) => write!(f, "invalid README pattern: {e}"),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArtifactError::Io { source, .. } => Some(source),
            ArtifactError::Pattern(e) => Some(e),
        }
    }
}

/// What happened to the README size line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeUpdate {
    /// The marker line was found and now reads `gib`.
    Updated { gib: u64 },
    /// No `# {repository} (<N> GiB)` line; the file was left untouched.
    MarkerMissing,
}

fn write_file(path: &Path, content: &str) -> Result<(), ArtifactError> {
    fs::write(path, content).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[WRITE][ERROR] Failed to write artifact");
        ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Write each line followed by a newline.
pub fn write_changelog(path: &Path, lines: &[String]) -> Result<(), ArtifactError> {
    let content: String = lines.iter().map(|line| format!("{line}\n")).collect();
    write_file(path, &content)?;
    info!(path = %path.display(), lines = lines.len(), "[WRITE] Wrote changelog");
    Ok(())
}

/// Write one download link per line, in the given order.
pub fn write_preferred(path: &Path, preferred: &[PreferredRelease]) -> Result<(), ArtifactError> {
    let content: String = preferred.iter().map(|p| format!("{}\n", p.link)).collect();
    write_file(path, &content)?;
    info!(path = %path.display(), entries = preferred.len(), "[WRITE] Wrote preferred releases");
    Ok(())
}

/// Replace the number in every `# {repository} (<N> GiB)` line of `content` with `gib`.
///
/// Returns `None` when no such line exists.
pub fn replace_size_line(
    content: &str,
    repository: &str,
    gib: u64,
) -> Result<Option<String>, ArtifactError> {
    let pattern = format!(r"# {} \(\d+ GiB\)", regex::escape(repository));
    let re = Regex::new(&pattern).map_err(ArtifactError::Pattern)?;
    if !re.is_match(content) {
        return Ok(None);
    }
    let replacement = format!("# {repository} ({gib} GiB)");
    Ok(Some(re.replace_all(content, NoExpand(&replacement)).into_owned()))
}

/// Rewrite the README size line to `gib`. A README without the marker is not rewritten.
pub fn update_readme(
    path: &Path,
    repository: &str,
    gib: u64,
) -> Result<ReadmeUpdate, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[WRITE][ERROR] Failed to read README");
        ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    match replace_size_line(&content, repository, gib)? {
        Some(updated) => {
            write_file(path, &updated)?;
            info!(path = %path.display(), gib, "[WRITE] Updated README size line");
            Ok(ReadmeUpdate::Updated { gib })
        }
        None => {
            warn!(
                path = %path.display(),
                repository,
                "[WRITE] README has no '# {repository} (<N> GiB)' line, leaving it unchanged"
            );
            Ok(ReadmeUpdate::MarkerMissing)
        }
    }
}
