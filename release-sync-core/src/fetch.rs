//! Release fetcher: lists every release of a repository from the GitHub REST API,
//! following `Link: <...>; rel="next"` pagination until the last page.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, LINK};
use reqwest::Client;
use tracing::{debug, error, info};

use crate::contract::{Release, ReleaseSource};

pub const GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT_VALUE: &str = concat!("release-sync/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read.
    Transport { url: String, source: reqwest::Error },
    /// The API answered with a non-success status.
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    /// The body was not a JSON array of releases.
    Decode { url: String, source: serde_json::Error },
    /// The HTTP client could not be constructed.
    Client(reqwest::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, source } => write!(f, "request to {url} failed: {source}"),
            FetchError::Status { url, status, body } => {
                write!(f, "{url} returned {status}: {body}")
            }
            FetchError::Decode { url, source } => {
                write!(f, "could not decode releases from {url}: {source}")
            }
            FetchError::Client(e) => write!(f, "could not build HTTP client: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport { source, .. } => Some(source),
            FetchError::Decode { source, .. } => Some(source),
            FetchError::Client(e) => Some(e),
            FetchError::Status { .. } => None,
        }
    }
}

/// Lists releases through the GitHub REST API (or anything serving the same shape at `api_base`).
pub struct GitHubReleaseSource {
    client: Client,
    api_base: String,
}

impl GitHubReleaseSource {
    /// `timeout` bounds each page request; `None` waits indefinitely.
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(USER_AGENT_VALUE);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn releases_url(&self, repository: &str) -> String {
        format!("{}/repos/{}/releases", self.api_base, repository)
    }

    /// Fetch one page, returning its releases and the URL of the next page, if any.
    async fn fetch_page(&self, url: &str) -> Result<(Vec<Release>, Option<String>), FetchError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "[FETCH][ERROR] Failed to reach release listing");
                FetchError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            })?;

        let status = resp.status();
        let next = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);

        let text = resp.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        if !status.is_success() {
            error!(status = %status, url = %url, "[FETCH][ERROR] Release listing returned error. Response body: {text}");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body: text,
            });
        }

        let releases: Vec<Release> = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, url = %url, "[FETCH][ERROR] Failed to parse releases JSON");
            FetchError::Decode {
                url: url.to_string(),
                source: e,
            }
        })?;
        Ok((releases, next))
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn list_releases(&self, repository: &str) -> Result<Vec<Release>, FetchError> {
        let mut releases = Vec::new();
        let mut url = Some(self.releases_url(repository));
        let mut page = 0;

        while let Some(current) = url {
            page += 1;
            let (batch, next) = self.fetch_page(&current).await?;
            debug!(page, url = %current, count = batch.len(), has_next = next.is_some(), "[FETCH] Fetched release page");
            releases.extend(batch);
            url = next;
        }

        info!(repository, pages = page, releases = releases.len(), "[FETCH] Listed all releases");
        Ok(releases)
    }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
///
/// Each link is `<target>; param=value; ...`; the `rel` value may be quoted and may list
/// several space-separated relations.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim().strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts
            .filter_map(|param| param.split_once('='))
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("rel"))
            .any(|(_, value)| {
                value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel == "next")
            });
        is_next.then(|| target.to_string())
    })
}

/// List all releases from `source` and sort them by their entire name, descending.
///
/// Names embed zero-padded dates, so this is newest-first by date and, within one date,
/// descending by variant.
pub async fn fetch_releases<S>(source: &S, repository: &str) -> Result<Vec<Release>, FetchError>
where
    S: ReleaseSource + ?Sized,
{
    let mut releases = source.list_releases(repository).await?;
    releases.sort_by(|a, b| b.name().cmp(a.name()));
    Ok(releases)
}
