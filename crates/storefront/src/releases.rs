//! GitHub release download badges.
//!
//! Sums asset download counts across all releases of the desktop app and
//! buckets them by platform for the download section. Responses are cached
//! with `moka` for 10 minutes to stay under the anonymous rate limit.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, instrument};

use crate::config::GithubConfig;

/// Errors that can occur when fetching releases.
#[derive(Debug, Error)]
pub enum ReleasesError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not a release list.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// Response Types
// =============================================================================

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub download_count: u64,
}

/// Desktop platform an installer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::Windows, Self::MacOs, Self::Linux];

    /// Classify an asset by file extension, ignoring case.
    #[must_use]
    pub fn from_asset_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let has = |exts: &[&str]| exts.iter().any(|ext| name.ends_with(ext));

        if has(&[".exe", ".msi"]) {
            Some(Self::Windows)
        } else if has(&[".dmg", ".pkg"]) {
            Some(Self::MacOs)
        } else if has(&[".appimage", ".deb", ".rpm", ".tar.gz"]) {
            Some(Self::Linux)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Download totals per platform plus the newest release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadBadges {
    pub counts: BTreeMap<Platform, u64>,
    pub latest_tag: Option<String>,
    pub latest_published_at: Option<DateTime<Utc>>,
}

impl DownloadBadges {
    /// Aggregate a release list.
    ///
    /// Assets with unrecognized extensions are ignored. Every platform is
    /// present in `counts`, zero if nothing matched.
    #[must_use]
    pub fn aggregate(releases: &[Release]) -> Self {
        let mut counts: BTreeMap<Platform, u64> =
            Platform::ALL.iter().map(|p| (*p, 0)).collect();

        for asset in releases.iter().flat_map(|r| &r.assets) {
            if let Some(platform) = Platform::from_asset_name(&asset.name) {
                *counts.entry(platform).or_default() += asset.download_count;
            }
        }

        let latest = releases
            .iter()
            .max_by_key(|r| r.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC));

        Self {
            counts,
            latest_tag: latest.map(|r| r.tag_name.clone()),
            latest_published_at: latest.and_then(|r| r.published_at),
        }
    }

    #[must_use]
    pub fn count(&self, platform: Platform) -> u64 {
        self.counts.get(&platform).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Compact badge text for a platform, e.g. `1.2k`.
    #[must_use]
    pub fn label(&self, platform: Platform) -> String {
        compact_count(self.count(platform))
    }
}

/// Format a count for a badge: `999`, `1k`, `1.2k`, `3.4M`.
#[must_use]
pub fn compact_count(count: u64) -> String {
    fn scaled(count: u64, unit: u64, suffix: &str) -> String {
        let whole = count / unit;
        let tenth = (count % unit) * 10 / unit;
        if tenth == 0 {
            format!("{whole}{suffix}")
        } else {
            format!("{whole}.{tenth}{suffix}")
        }
    }

    match count {
        0..1_000 => count.to_string(),
        1_000..1_000_000 => scaled(count, 1_000, "k"),
        _ => scaled(count, 1_000_000, "M"),
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the GitHub releases endpoint.
#[derive(Clone)]
pub struct ReleasesClient {
    inner: Arc<ReleasesClientInner>,
}

struct ReleasesClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    cache: Cache<(), DownloadBadges>,
}

impl std::fmt::Debug for ReleasesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasesClient")
            .field("endpoint", &self.inner.endpoint)
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ReleasesClient {
    /// Create a client for `{api_url}/repos/{owner}/{repo}/releases`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &GithubConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(600)) // 10 minutes
            .build();

        let endpoint = format!(
            "{}/repos/{}/{}/releases",
            config.api_url.as_str().trim_end_matches('/'),
            config.owner,
            config.repo
        );

        Self {
            inner: Arc::new(ReleasesClientInner {
                client,
                endpoint,
                token: config
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                cache,
            }),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Download badges, or `None` if GitHub could not be reached.
    pub async fn download_badges(&self) -> Option<DownloadBadges> {
        if let Some(cached) = self.inner.cache.get(&()).await {
            return Some(cached);
        }

        match self.fetch_releases().await {
            Ok(releases) => {
                let badges = DownloadBadges::aggregate(&releases);
                self.inner.cache.insert((), badges.clone()).await;
                Some(badges)
            }
            Err(e) => {
                error!(error = %e, endpoint = %self.inner.endpoint, "Error fetching releases");
                None
            }
        }
    }

    /// Fetch the raw release list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body
    /// is not a release list.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_releases(&self) -> Result<Vec<Release>, ReleasesError> {
        let mut request = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReleasesError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
