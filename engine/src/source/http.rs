use super::{AssetSource, FetchResponse, parse_listing};
use crate::common::errors::SourceError;
use crate::model::DirectoryEntry;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::ACCEPT;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://alexkolmar.github.io/cleanstyle/";
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/alexkolmar/cleanstyle/contents/themes";
pub const DEFAULT_USER_AGENT: &str = concat!("forumstyle/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Connection settings of [`HttpAssetSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Site root every asset path is resolved against.
    pub base_url: String,
    /// Contents API endpoint listing the themes folder.
    pub listing_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Reads themes from the published site and lists them through the
/// GitHub contents API.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: reqwest::Client,
    base_url: Url,
    listing_url: String,
}

impl HttpAssetSource {
    pub fn new(config: &HttpSourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SourceError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            listing_url: config.listing_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a site-relative asset path against the base URL.
    ///
    /// Each segment is percent-encoded, so theme folders named `clean v2`
    /// or `a#b` stay inside the path.
    pub fn resolve(&self, path: &str) -> Result<Url, SourceError> {
        let encoded = encode_path(path.trim_start_matches('/'));
        self.base_url
            .join(&encoded)
            .map_err(|e| SourceError::InvalidUrl {
                url: format!("{}{}", self.base_url, encoded),
                reason: e.to_string(),
            })
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&normalized).map_err(|e| SourceError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn list_theme_directories(&self) -> Result<Vec<DirectoryEntry>, SourceError> {
        let response = self
            .client
            .get(&self.listing_url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: self.listing_url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: self.listing_url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport {
                url: self.listing_url.clone(),
                reason: e.to_string(),
            })?;
        parse_listing(&self.listing_url, &body)
    }

    async fn probe(&self, path: &str) -> bool {
        let url = match self.resolve(path) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Probe skipped: {e}");
                return false;
            }
        };

        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Probe of {path} failed: {e}");
                false
            }
        }
    }

    async fn fetch(&self, path: &str) -> Result<FetchResponse, SourceError> {
        let url = self.resolve(path)?;
        let response =
            self.client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| SourceError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_site_subpath() {
        let source = HttpAssetSource::new(&HttpSourceConfig {
            base_url: "https://example.github.io/cleanstyle".to_string(),
            ..HttpSourceConfig::default()
        })
        .unwrap();

        let url = source.resolve("themes/cyrodiil/style.css").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.github.io/cleanstyle/themes/cyrodiil/style.css"
        );

        let rooted = source.resolve("/header.html").unwrap();
        assert_eq!(rooted.as_str(), "https://example.github.io/cleanstyle/header.html");
    }

    #[test]
    fn test_resolve_encodes_theme_folder_names() {
        let source = HttpAssetSource::new(&HttpSourceConfig::default()).unwrap();

        let dotted = source.resolve("themes/clean.v2/style.css").unwrap();
        assert_eq!(
            dotted.as_str(),
            "https://alexkolmar.github.io/cleanstyle/themes/clean.v2/style.css"
        );

        let spaced = source.resolve("themes/dark forest#2/header.html").unwrap();
        assert_eq!(
            spaced.as_str(),
            "https://alexkolmar.github.io/cleanstyle/themes/dark%20forest%232/header.html"
        );
        assert_eq!(spaced.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = HttpAssetSource::new(&HttpSourceConfig {
            base_url: "not a url".to_string(),
            ..HttpSourceConfig::default()
        });
        assert!(matches!(result, Err(SourceError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_probe_is_false() {
        let source = HttpAssetSource::new(&HttpSourceConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            request_timeout: Duration::from_millis(500),
            ..HttpSourceConfig::default()
        })
        .unwrap();

        assert!(!source.probe("themes/cyrodiil/style.css").await);
        assert!(source.fetch("themes/cyrodiil/header.html").await.is_err());
    }
}
