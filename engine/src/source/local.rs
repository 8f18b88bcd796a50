use super::{AssetSource, FetchResponse};
use crate::common::errors::SourceError;
use crate::model::{DEFAULT_THEMES_ROOT, DirectoryEntry, EntryKind};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves a checkout of the static site from disk.
///
/// Useful for previewing themes before they are published. The listing is
/// read from `<root>/<themes_root>`.
#[derive(Debug, Clone)]
pub struct LocalAssetSource {
    root: PathBuf,
    themes_root: String,
}

impl LocalAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            themes_root: DEFAULT_THEMES_ROOT.to_string(),
        }
    }

    pub fn with_themes_root(mut self, themes_root: &str) -> Self {
        self.themes_root = themes_root.trim_matches('/').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a site path into the checkout. Paths escaping the root are refused.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            log::warn!("Refusing asset path outside the site root: {path}");
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for LocalAssetSource {
    async fn list_theme_directories(&self) -> Result<Vec<DirectoryEntry>, SourceError> {
        let dir = self.root.join(&self.themes_root);
        let io_error = |source| SourceError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut reader = tokio::fs::read_dir(&dir).await.map_err(io_error)?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(io_error)? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let file_type = entry.file_type().await.map_err(io_error)?;
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirectoryEntry { kind, name });
        }
        Ok(entries)
    }

    async fn probe(&self, path: &str) -> bool {
        match self.resolve(path) {
            Some(file) => tokio::fs::metadata(&file)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false),
            None => false,
        }
    }

    async fn fetch(&self, path: &str) -> Result<FetchResponse, SourceError> {
        let Some(file) = self.resolve(path) else {
            return Ok(FetchResponse {
                status: 403,
                body: String::new(),
            });
        };

        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(source) => Err(SourceError::Io {
                path: file.display().to_string(),
                source,
            }),
        }
    }
}
