//! Wires configuration into the engine: asset source, page, store.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use engine::page::PageModel;
use engine::persistence::{FileStore, KeyValueStore};
use engine::source::{AssetSource, HttpAssetSource, LocalAssetSource};
use engine::{ControllerSettings, ThemeController};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line flags that take precedence over the configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub offline: Option<PathBuf>,
    pub page: Option<PathBuf>,
}

/// Everything one lifecycle run needs.
pub struct Session<K: KeyValueStore> {
    pub source: Arc<dyn AssetSource>,
    pub page: PageModel,
    pub store: K,
    pub settings: ControllerSettings,
}

impl Session<FileStore> {
    pub fn from_config(config: &AppConfig, overrides: &Overrides) -> AppResult<Self> {
        Ok(Self {
            source: build_source(config, overrides.offline.as_deref())?,
            page: load_page(config, overrides.page.as_deref())?,
            store: open_store(config)?,
            settings: config.controller_settings(),
        })
    }
}

impl<K: KeyValueStore> Session<K> {
    pub fn into_controller(self) -> ThemeController<dyn AssetSource, PageModel, K> {
        ThemeController::new(self.source, self.page, self.store, self.settings)
    }
}

/// A local checkout (`--offline` or `site.local_root`) wins over the
/// published site.
pub fn build_source(config: &AppConfig, offline: Option<&Path>) -> AppResult<Arc<dyn AssetSource>> {
    let themes_root = config.catalog().themes_root();
    if let Some(root) = offline.or(config.site().local_root()) {
        log::info!("Serving themes from local checkout {}", root.display());
        return Ok(Arc::new(
            LocalAssetSource::new(root).with_themes_root(themes_root),
        ));
    }

    let http = config.site().http_source_config();
    log::info!("Serving themes from {}", http.base_url);
    Ok(Arc::new(HttpAssetSource::new(&http)?))
}

/// Reads a JSON page model, or generates the default forum skeleton.
pub fn load_page(config: &AppConfig, page_override: Option<&Path>) -> AppResult<PageModel> {
    let Some(path) = page_override.or(config.page().skeleton()) else {
        let page = config.page();
        return Ok(PageModel::forum_skeleton(
            page.landing_path(),
            &page.forum_ids(),
        ));
    };

    let content = std::fs::read_to_string(path).map_err(|source| AppError::Skeleton {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| AppError::InvalidSkeleton {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn open_store(config: &AppConfig) -> AppResult<FileStore> {
    let origin = config.storage().origin(config.site());
    let store = match config.storage().dir() {
        Some(dir) => FileStore::new(dir, origin),
        None => FileStore::for_origin(origin)?,
    };
    log::debug!("Saved selections live in {}", store.path().display());
    Ok(store)
}
