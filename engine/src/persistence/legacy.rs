//! The older demo switcher: the selector values are plain stylesheet
//! filenames written straight into the primary link.

use super::KeyValueStore;
use crate::common::errors::StoreError;
use crate::page::Page;

pub const LEGACY_THEME_KEY: &str = "demo-forum-theme";
pub const DEFAULT_LEGACY_STYLESHEET: &str = "style.css";

#[derive(Debug)]
pub struct LegacyStylesheetSwitcher<K: KeyValueStore> {
    store: K,
    link_id: String,
    selector_id: String,
}

impl<K: KeyValueStore> LegacyStylesheetSwitcher<K> {
    pub fn new(store: K, link_id: &str, selector_id: &str) -> Self {
        Self {
            store,
            link_id: link_id.to_string(),
            selector_id: selector_id.to_string(),
        }
    }

    /// The stored stylesheet filename, or [`DEFAULT_LEGACY_STYLESHEET`].
    pub async fn saved_stylesheet(&self) -> String {
        match self.store.get(LEGACY_THEME_KEY).await {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => DEFAULT_LEGACY_STYLESHEET.to_string(),
            Err(e) => {
                log::warn!("Failed to read saved stylesheet: {e}");
                DEFAULT_LEGACY_STYLESHEET.to_string()
            }
        }
    }

    /// Points the link and the selector at the saved stylesheet.
    ///
    /// Either element may be absent; whatever exists is updated.
    pub async fn restore<P: Page + ?Sized>(&self, page: &mut P) -> String {
        let stylesheet = self.saved_stylesheet().await;
        self.show(page, &stylesheet);
        stylesheet
    }

    /// Switches to `stylesheet` and remembers it.
    pub async fn change<P: Page + ?Sized>(
        &self,
        page: &mut P,
        stylesheet: &str,
    ) -> Result<(), StoreError> {
        self.set_link(page, stylesheet);
        self.store.set(LEGACY_THEME_KEY, stylesheet).await?;
        log::info!("Stylesheet switched to {stylesheet}");
        Ok(())
    }

    fn set_link<P: Page + ?Sized>(&self, page: &mut P, stylesheet: &str) {
        if page.contains(&self.link_id) {
            if let Err(e) = page.set_stylesheet_href(&self.link_id, Some(stylesheet)) {
                log::warn!("Stylesheet link not updated: {e}");
            }
        }
    }

    fn show<P: Page + ?Sized>(&self, page: &mut P, stylesheet: &str) {
        self.set_link(page, stylesheet);
        if page.contains(&self.selector_id) {
            if let Err(e) = page.set_selector_value(&self.selector_id, stylesheet) {
                log::debug!("Selector not updated: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageModel;
    use crate::persistence::MemoryStore;
    use claims::{assert_ok, assert_some_eq};

    fn page() -> PageModel {
        PageModel::new("/index.html")
            .with_stylesheet("theme-stylesheet", Some("style.css"))
            .with_selector("theme-select")
    }

    #[tokio::test]
    async fn test_restore_defaults_to_style_css() {
        let switcher =
            LegacyStylesheetSwitcher::new(MemoryStore::new(), "theme-stylesheet", "theme-select");
        let mut page = page();
        assert_eq!(switcher.restore(&mut page).await, "style.css");
        assert_some_eq!(page.selector_value("theme-select"), "style.css");
    }

    #[tokio::test]
    async fn test_change_persists_and_restores() {
        let store = MemoryStore::new();
        let switcher = LegacyStylesheetSwitcher::new(&store, "theme-stylesheet", "theme-select");
        let mut page = page();
        assert_ok!(switcher.change(&mut page, "style_dark.css").await);
        assert_some_eq!(page.stylesheet_href("theme-stylesheet"), "style_dark.css");

        let mut reloaded = self::page();
        assert_eq!(switcher.restore(&mut reloaded).await, "style_dark.css");
        assert_some_eq!(reloaded.stylesheet_href("theme-stylesheet"), "style_dark.css");
        assert_some_eq!(reloaded.selector_value("theme-select"), "style_dark.css");
    }

    #[tokio::test]
    async fn test_missing_elements_are_tolerated() {
        let store = MemoryStore::new().with_value(LEGACY_THEME_KEY, "style2.css");
        let switcher = LegacyStylesheetSwitcher::new(store, "theme-stylesheet", "theme-select");
        let mut page = PageModel::new("/");
        assert_eq!(switcher.restore(&mut page).await, "style2.css");
        assert_ok!(switcher.change(&mut page, "style.css").await);
    }
}
