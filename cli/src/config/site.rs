use engine::source::HttpSourceConfig;
use engine::source::http::{DEFAULT_BASE_URL, DEFAULT_LISTING_URL, DEFAULT_USER_AGENT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where the forum site and its themes live.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SiteConfig {
    base_url: Option<String>,
    listing_url: Option<String>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
    /// Serve assets from a local checkout instead of the published site.
    local_root: Option<PathBuf>,
}

impl SiteConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_deref().unwrap_or(DEFAULT_LISTING_URL)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn local_root(&self) -> Option<&Path> {
        self.local_root.as_deref()
    }

    pub fn http_source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            base_url: self.base_url().to_string(),
            listing_url: self.listing_url().to_string(),
            user_agent: self.user_agent().to_string(),
            request_timeout: Duration::from_secs(self.request_timeout_secs()),
        }
    }
}

/// Where the saved selection is kept.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    /// Overrides `<config_dir>/forumstyle/storage`.
    dir: Option<PathBuf>,
    /// Origin the saved values belong to. Defaults to the site base URL.
    origin: Option<String>,
}

impl StorageConfig {
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn origin<'a>(&'a self, site: &'a SiteConfig) -> &'a str {
        self.origin.as_deref().unwrap_or_else(|| site.base_url())
    }
}
