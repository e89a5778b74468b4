//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_BASE_URL` - Base URL of the products API (default: `https://api.littleoatlearners.com`)
//! - `CHECKOUT_BASE_URL` - Base URL of the checkout API (default: `CATALOG_BASE_URL`)
//! - `ANALYTICS_BASE_URL` - Base URL of the page-view tracker (unset disables tracking)
//! - `GITHUB_API_URL` - GitHub REST API base (default: `https://api.github.com`)
//! - `GITHUB_REPOSITORY` - `owner/repo` whose release downloads are shown
//! - `GITHUB_TOKEN` - Token for higher GitHub rate limits
//! - `STOREFRONT_CARD_MODE` - `cart` or `buy-now` (default: cart)
//! - `STOREFRONT_STORAGE_PATH` - Local storage document (default: `.little-oat/local-storage.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::render::CardMode;

const DEFAULT_API_BASE_URL: &str = "https://api.littleoatlearners.com";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_STORAGE_PATH: &str = ".little-oat/local-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL for `GET /api/products`
    pub catalog_base_url: Url,
    /// Base URL for `POST /api/checkout`
    pub checkout_base_url: Url,
    /// Base URL for `POST /api/analytics/track`; `None` disables tracking
    pub analytics_base_url: Option<Url>,
    /// Release download badges; `None` disables them
    pub github: Option<GithubConfig>,
    /// Which action control product cards carry
    pub card_mode: CardMode,
    /// File backing local storage for terminal hosts
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// GitHub repository whose releases feed the download badges.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct GithubConfig {
    /// REST API base URL
    pub api_url: Url,
    pub owner: String,
    pub repo: String,
    /// Optional access token (raises the anonymous rate limit)
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let catalog_base_url = parse_url(
            "CATALOG_BASE_URL",
            &get("CATALOG_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let checkout_base_url = match get("CHECKOUT_BASE_URL") {
            Some(value) => parse_url("CHECKOUT_BASE_URL", &value)?,
            None => catalog_base_url.clone(),
        };
        let analytics_base_url = get("ANALYTICS_BASE_URL")
            .map(|value| parse_url("ANALYTICS_BASE_URL", &value))
            .transpose()?;

        let github = match get("GITHUB_REPOSITORY") {
            Some(repository) => {
                let (owner, repo) = parse_repository(&repository)?;
                Some(GithubConfig {
                    api_url: parse_url(
                        "GITHUB_API_URL",
                        &get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                    )?,
                    owner,
                    repo,
                    token: get("GITHUB_TOKEN").map(SecretString::from),
                })
            }
            None => None,
        };

        let card_mode = match get("STOREFRONT_CARD_MODE") {
            Some(value) => value
                .parse::<CardMode>()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_CARD_MODE".to_string(), e))?,
            None => CardMode::default(),
        };

        let storage_path = PathBuf::from(
            get("STOREFRONT_STORAGE_PATH").unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
        );

        Ok(Self {
            catalog_base_url,
            checkout_base_url,
            analytics_base_url,
            github,
            card_mode,
            storage_path,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration with catalog, checkout and analytics all served from
    /// one base URL. Release badges are disabled.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base = parse_url("base_url", base_url)?;
        Ok(Self {
            catalog_base_url: base.clone(),
            checkout_base_url: base.clone(),
            analytics_base_url: Some(base),
            github: None,
            card_mode: CardMode::default(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Split `owner/repo`.
fn parse_repository(value: &str) -> Result<(String, String), ConfigError> {
    let invalid = || {
        ConfigError::InvalidEnvVar(
            "GITHUB_REPOSITORY".to_string(),
            format!("expected 'owner/repo', got '{value}'"),
        )
    };
    let (owner, repo) = value.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}
