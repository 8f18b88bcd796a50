//! Asset sources.
//!
//! Every read the engine performs goes through [`AssetSource`]: the theme
//! listing, existence probes and fragment/manifest fetches. Paths are
//! relative to the site root (`themes/cyrodiil/style.css`).

use crate::common::errors::SourceError;
use crate::model::DirectoryEntry;
use async_trait::async_trait;

pub mod http;
pub mod local;
pub mod memory;

pub use http::{HttpAssetSource, HttpSourceConfig};
pub use local::LocalAssetSource;
pub use memory::MemoryAssetSource;

/// Response of a content fetch.
///
/// A non-success status is a normal outcome, not an error: missing
/// fragments are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parses a contents-listing body: a JSON array of `{ "type", "name" }`.
pub fn parse_listing(url: &str, body: &str) -> Result<Vec<DirectoryEntry>, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::InvalidResponse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Lists the entries of the themes root folder.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the listing is unreachable, answers with
    /// a non-success status or returns a body that is not a listing.
    async fn list_theme_directories(&self) -> Result<Vec<DirectoryEntry>, SourceError>;

    /// Existence probe. Transport failures count as "does not exist".
    async fn probe(&self, path: &str) -> bool;

    /// Fetches the content of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] only when no response was obtained at all.
    async fn fetch(&self, path: &str) -> Result<FetchResponse, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let entries = parse_listing(
            "https://api.github.com/x",
            r#"[{"type": "dir", "name": "cyrodiil"}, {"type": "file", "name": "a.md"}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir());

        let error = parse_listing("https://api.github.com/x", r#"{"message": "Not Found"}"#);
        assert!(matches!(error, Err(SourceError::InvalidResponse { .. })));
    }
}
