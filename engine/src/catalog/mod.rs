//! Theme discovery.
//!
//! A theme is any folder under the themes root that serves a main
//! stylesheet. Folders are listed through the asset source; when the
//! listing is unavailable a fixed list of known theme names is probed
//! instead.

use crate::model::{
    DEFAULT_THEMES_ROOT, MAIN_STYLESHEET_FILE, ThemeCatalog, ThemeDescriptor,
};
use crate::source::AssetSource;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub mod display;
pub mod validation;

pub use display::{DisplayNames, format_theme_id};
pub use validation::{ThemeIdValidator, Validator};

pub const DEFAULT_KNOWN_THEMES: [&str; 4] = ["clean_new", "clean_old", "cyrodiil", "pinot_grigio"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub themes_root: String,
    /// Probed when the listing fails.
    pub known_themes: Vec<String>,
    /// Per-theme fragment folders replacing `themes/<id>/`.
    pub fragment_roots: HashMap<String, String>,
    /// Whether descriptors carry a `descriptions.json` path.
    pub descriptions_enabled: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            themes_root: DEFAULT_THEMES_ROOT.to_string(),
            known_themes: DEFAULT_KNOWN_THEMES.iter().map(|s| s.to_string()).collect(),
            fragment_roots: HashMap::new(),
            descriptions_enabled: true,
        }
    }
}

pub struct ThemeDiscovery<S: AssetSource + ?Sized> {
    source: Arc<S>,
    config: CatalogConfig,
    validator: ThemeIdValidator,
}

impl<S: AssetSource + ?Sized> ThemeDiscovery<S> {
    pub fn new(source: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            source,
            config,
            validator: ThemeIdValidator,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Builds the catalog for this page load.
    ///
    /// Never fails: a broken listing falls back to the known themes, and a
    /// failed probe only excludes its candidate.
    pub async fn discover(&self) -> ThemeCatalog {
        let candidates = match self.source.list_theme_directories().await {
            Ok(entries) => {
                let folders: Vec<String> = entries
                    .into_iter()
                    .filter(|entry| entry.is_dir())
                    .map(|entry| entry.name)
                    .collect();
                log::debug!("Theme listing returned {} folders", folders.len());
                folders
            }
            Err(e) => {
                log::warn!("Theme listing unavailable ({e}), probing known themes instead");
                self.config.known_themes.clone()
            }
        };

        let catalog = self.probe_candidates(candidates).await;
        log::info!("Discovered themes: {:?}", catalog.sorted_ids());
        catalog
    }

    /// Keeps the candidates whose main stylesheet answers a probe.
    async fn probe_candidates(&self, candidates: Vec<String>) -> ThemeCatalog {
        let mut seen = HashSet::new();
        let descriptors: Vec<ThemeDescriptor> = candidates
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .filter_map(|name| match self.validator.validate(name.as_str()) {
                Ok(()) => Some(self.describe(&name)),
                Err(e) => {
                    log::warn!("Skipping theme folder: {e}");
                    None
                }
            })
            .collect();

        let probes = descriptors
            .iter()
            .map(|descriptor| self.source.probe(&descriptor.main_stylesheet));
        let results = join_all(probes).await;

        descriptors
            .into_iter()
            .zip(results)
            .filter_map(|(descriptor, exists)| {
                if exists {
                    log::info!("Theme \"{}\" added", descriptor.id);
                    Some(descriptor)
                } else {
                    log::debug!(
                        "Theme \"{}\" skipped (no {MAIN_STYLESHEET_FILE})",
                        descriptor.id
                    );
                    None
                }
            })
            .collect()
    }

    fn describe(&self, id: &str) -> ThemeDescriptor {
        let mut descriptor = ThemeDescriptor::new(id, &self.config.themes_root);
        if !self.config.descriptions_enabled {
            descriptor = descriptor.without_description_manifest();
        }
        if let Some(root) = self.config.fragment_roots.get(id) {
            descriptor = descriptor.with_fragment_root(root);
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectoryEntry;
    use crate::source::MemoryAssetSource;

    #[tokio::test]
    async fn test_only_folders_with_main_stylesheet_are_listed() {
        let source = MemoryAssetSource::new()
            .with_listing(vec![
                DirectoryEntry::dir("clean_old"),
                DirectoryEntry::dir("drafts"),
                DirectoryEntry::file("README.md"),
            ])
            .with_asset("themes/clean_old/style.css", "body {}")
            .with_asset("themes/README.md/style.css", "body {}");
        let discovery = ThemeDiscovery::new(Arc::new(source), CatalogConfig::default());

        let catalog = discovery.discover().await;
        assert_eq!(catalog.sorted_ids(), vec!["clean_old"]);
    }

    #[tokio::test]
    async fn test_fragment_root_and_manifest_settings() {
        let source = MemoryAssetSource::new()
            .with_theme_dirs(&["clean_new"])
            .with_asset("themes/clean_new/style.css", "body {}");
        let config = CatalogConfig {
            fragment_roots: HashMap::from([("clean_new".to_string(), "".to_string())]),
            descriptions_enabled: false,
            ..CatalogConfig::default()
        };
        let catalog = ThemeDiscovery::new(Arc::new(source), config).discover().await;

        let descriptor = catalog.get("clean_new").unwrap();
        assert_eq!(descriptor.fragment_path("header.html"), "header.html");
        assert_eq!(descriptor.description_manifest, None);
    }

    #[tokio::test]
    async fn test_dotted_and_spaced_folder_names_are_themes() {
        let source = MemoryAssetSource::new()
            .with_theme_dirs(&["clean.v2", "dark forest", ".."])
            .with_asset("themes/clean.v2/style.css", "body {}")
            .with_asset("themes/dark forest/style.css", "body {}");
        let catalog = ThemeDiscovery::new(Arc::new(source), CatalogConfig::default())
            .discover()
            .await;

        assert_eq!(catalog.sorted_ids(), vec!["clean.v2", "dark forest"]);
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_names_are_requested_once() {
        let source = Arc::new(
            MemoryAssetSource::new()
                .with_theme_dirs(&["cyrodiil", "cyrodiil", "../secret"])
                .with_asset("themes/cyrodiil/style.css", "body {}"),
        );
        let catalog = ThemeDiscovery::new(source.clone(), CatalogConfig::default())
            .discover()
            .await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(source.request_count("HEAD themes/cyrodiil/style.css"), 1);
        assert!(source.requests().iter().all(|r| !r.contains("secret")));
    }
}
