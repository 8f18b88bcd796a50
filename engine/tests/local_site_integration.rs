//! Discovery, apply and persistence against a site checkout on disk.

use claims::{assert_none, assert_ok, assert_some_eq};
use engine::catalog::{CatalogConfig, ThemeDiscovery};
use engine::page::{Page, PageModel};
use engine::persistence::{FileStore, KeyValueStore, THEME_STORAGE_KEY};
use engine::source::LocalAssetSource;
use engine::{ControllerSettings, ThemeController};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

mod site_helpers {
    use super::*;

    pub fn write_theme(root: &Path, id: &str, files: &[(&str, &str)]) {
        let dir = root.join("themes").join(id);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    /// A checkout with three valid themes (one with a dotted folder name),
    /// one folder without a stylesheet and a stray file.
    pub fn create_site() -> TempDir {
        let site = TempDir::new().unwrap();
        let root = site.path();
        write_theme(
            root,
            "clean_new",
            &[
                ("style.css", "body {}"),
                ("announcement.html", "<b>Welcome</b>"),
                ("descriptions.json", r#"{"forum1": "<i>News</i>"}"#),
            ],
        );
        write_theme(root, "pinot_grigio", &[("style.css", "body {}"), ("style_cs.css", "")]);
        write_theme(root, "drafts", &[("notes.txt", "wip")]);
        write_theme(root, "clean.v2", &[("style.css", "body {}")]);
        fs::write(root.join("themes").join("README.md"), "themes").unwrap();
        site
    }
}

use site_helpers::*;

mod discovery {
    use super::*;

    #[tokio::test]
    async fn test_discovers_every_folder_with_a_stylesheet() {
        let site = create_site();
        let source = Arc::new(LocalAssetSource::new(site.path()));
        let discovery = ThemeDiscovery::new(source, CatalogConfig::default());

        let catalog = discovery.discover().await;
        assert_eq!(
            catalog.sorted_ids(),
            vec!["clean.v2", "clean_new", "pinot_grigio"]
        );

        let clean_new = catalog.get("clean_new").unwrap();
        assert_eq!(clean_new.main_stylesheet, "themes/clean_new/style.css");
        assert_eq!(clean_new.secondary_stylesheet, "themes/clean_new/style_cs.css");
        assert_some_eq!(
            clean_new.description_manifest.as_deref(),
            "themes/clean_new/descriptions.json"
        );
    }

    #[tokio::test]
    async fn test_missing_themes_folder_falls_back_to_known_list() {
        let site = TempDir::new().unwrap();
        // only reachable through the known list
        fs::create_dir_all(site.path().join("assets").join("cyrodiil")).unwrap();
        fs::write(
            site.path().join("assets").join("cyrodiil").join("style.css"),
            "body {}",
        )
        .unwrap();

        let source = Arc::new(LocalAssetSource::new(site.path()).with_themes_root("missing"));
        let config = CatalogConfig {
            themes_root: "assets".to_string(),
            ..CatalogConfig::default()
        };
        let catalog = ThemeDiscovery::new(source, config).discover().await;
        assert_eq!(catalog.sorted_ids(), vec!["cyrodiil"]);
    }

    #[tokio::test]
    async fn test_fragment_root_override() {
        let site = create_site();
        let shared = site.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("footer.html"), "<p>Shared footer</p>").unwrap();

        let config = CatalogConfig {
            fragment_roots: HashMap::from([("pinot_grigio".to_string(), "shared".to_string())]),
            ..CatalogConfig::default()
        };
        let catalog = ThemeDiscovery::new(Arc::new(LocalAssetSource::new(site.path())), config)
            .discover()
            .await;
        let pinot = catalog.get("pinot_grigio").unwrap();
        assert_eq!(pinot.fragment_path("footer.html"), "shared/footer.html");
        assert_eq!(pinot.main_stylesheet, "themes/pinot_grigio/style.css");
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_selection_survives_reload() {
        let site = create_site();
        let storage = TempDir::new().unwrap();
        let source = Arc::new(LocalAssetSource::new(site.path()));
        let page = PageModel::forum_skeleton("/", &["forum1".to_string()]);

        let first = ThemeController::new(
            source.clone(),
            page.clone(),
            FileStore::new(storage.path(), "https://forum.example"),
            ControllerSettings::default(),
        );
        first.initialize().await;
        assert!(first.select("clean_new").await.is_applied());

        let rendered = first.into_page();
        assert_some_eq!(
            rendered.inner_html("pun-announcement"),
            "<div class=\"container\"><b>Welcome</b></div>"
        );
        assert_eq!(rendered.descriptions().len(), 1);
        assert_none!(rendered.stylesheet_href("theme-stylesheet-secondary"));

        let store = FileStore::new(storage.path(), "https://forum.example");
        assert_some_eq!(assert_ok!(store.get(THEME_STORAGE_KEY).await), "clean_new");

        let second = ThemeController::new(source, page, store, ControllerSettings::default());
        second.initialize().await;
        assert_eq!(second.current_theme(), "clean_new");
    }

    #[tokio::test]
    async fn test_empty_secondary_stylesheet_still_counts() {
        let site = create_site();
        let source = Arc::new(LocalAssetSource::new(site.path()));
        let page = PageModel::forum_skeleton("/", &[])
            .with_stylesheet("legacy-cs", Some("/old/style_cs.css"));
        let storage = TempDir::new().unwrap();
        let controller = ThemeController::new(
            source,
            page,
            FileStore::new(storage.path(), "local"),
            ControllerSettings::default(),
        );
        controller.initialize().await;
        controller.select("pinot_grigio").await;

        let page = controller.into_page();
        // the existing style_cs link is reused instead of adding a new one
        assert_some_eq!(
            page.stylesheet_href("legacy-cs"),
            "themes/pinot_grigio/style_cs.css"
        );
        assert!(!page.contains("theme-stylesheet-secondary"));
    }
}
