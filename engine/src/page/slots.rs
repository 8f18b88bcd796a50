use super::{DESCRIPTION_CLASS, Page};
use serde::{Deserialize, Serialize};

/// An HTML fragment file and the container it is injected into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSlot {
    pub file: String,
    pub container_id: String,
    /// Wrap the fragment in `<div class="container">` unless it already is.
    #[serde(default)]
    pub wrap: bool,
}

impl FragmentSlot {
    pub fn new(file: &str, container_id: &str, wrap: bool) -> Self {
        Self {
            file: file.to_string(),
            container_id: container_id.to_string(),
            wrap,
        }
    }
}

/// Mapping from logical page slots to element ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSlots {
    pub primary_link: String,
    pub secondary_link: String,
    /// An existing link whose href contains this text is reused as the
    /// secondary link.
    pub secondary_href_hint: String,
    pub fragments: Vec<FragmentSlot>,
    pub selector: String,
    pub selector_panel_class: String,
    pub heading_tag: String,
    pub description_class: String,
}

impl Default for PageSlots {
    fn default() -> Self {
        Self {
            primary_link: "theme-stylesheet".to_string(),
            secondary_link: "theme-stylesheet-secondary".to_string(),
            secondary_href_hint: "style_cs.css".to_string(),
            fragments: vec![
                FragmentSlot::new("header.html", "html-header", false),
                FragmentSlot::new("footer.html", "html-footer", true),
                FragmentSlot::new("announcement.html", "pun-announcement", true),
            ],
            selector: "theme-select".to_string(),
            selector_panel_class: "theme-demo-panel".to_string(),
            heading_tag: "h3".to_string(),
            description_class: DESCRIPTION_CLASS.to_string(),
        }
    }
}

impl PageSlots {
    /// Validates the slots against `page` once.
    ///
    /// Missing fragment containers and a missing primary link are logged and
    /// left out of the result, so later applies skip them silently. The
    /// secondary link is created when the page has none.
    pub fn bind<P: Page + ?Sized>(&self, page: &mut P) -> BoundSlots {
        let primary_link = if page.contains(&self.primary_link) {
            Some(self.primary_link.clone())
        } else {
            log::warn!(
                "Primary stylesheet link #{} not found, main stylesheet will not be swapped",
                self.primary_link
            );
            None
        };

        let secondary_link = match page.find_stylesheet_link(&self.secondary_href_hint) {
            Some(existing) => existing,
            None => {
                if !page.contains(&self.secondary_link) {
                    log::debug!("Creating secondary stylesheet link #{}", self.secondary_link);
                    page.create_stylesheet_link(&self.secondary_link);
                }
                self.secondary_link.clone()
            }
        };

        let fragments = self
            .fragments
            .iter()
            .filter(|slot| {
                let present = page.contains(&slot.container_id);
                if !present {
                    log::warn!(
                        "Container #{} not found, {} will be skipped",
                        slot.container_id,
                        slot.file
                    );
                }
                present
            })
            .cloned()
            .collect();

        if !page.contains(&self.selector) {
            log::debug!("Theme selector #{} not found, it will be created", self.selector);
        }

        BoundSlots {
            primary_link,
            secondary_link,
            fragments,
            selector: self.selector.clone(),
            selector_panel_class: self.selector_panel_class.clone(),
            heading_tag: self.heading_tag.clone(),
            description_class: self.description_class.clone(),
        }
    }
}

/// Slots validated against a concrete page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSlots {
    primary_link: Option<String>,
    secondary_link: String,
    fragments: Vec<FragmentSlot>,
    selector: String,
    selector_panel_class: String,
    heading_tag: String,
    description_class: String,
}

impl BoundSlots {
    pub fn primary_link(&self) -> Option<&str> {
        self.primary_link.as_deref()
    }

    pub fn secondary_link(&self) -> &str {
        &self.secondary_link
    }

    pub fn fragments(&self) -> &[FragmentSlot] {
        &self.fragments
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn selector_panel_class(&self) -> &str {
        &self.selector_panel_class
    }

    pub fn heading_tag(&self) -> &str {
        &self.heading_tag
    }

    pub fn description_class(&self) -> &str {
        &self.description_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageModel;

    #[test]
    fn test_bind_creates_secondary_link() {
        let mut page = PageModel::forum_skeleton("/", &[]);
        let bound = PageSlots::default().bind(&mut page);

        assert_eq!(bound.primary_link(), Some("theme-stylesheet"));
        assert_eq!(bound.secondary_link(), "theme-stylesheet-secondary");
        assert!(page.contains("theme-stylesheet-secondary"));
        assert_eq!(bound.fragments().len(), 3);
    }

    #[test]
    fn test_bind_reuses_existing_secondary_link() {
        let mut page = PageModel::forum_skeleton("/", &[])
            .with_stylesheet("legacy-cs", Some("themes/clean_old/style_cs.css"));
        let bound = PageSlots::default().bind(&mut page);

        assert_eq!(bound.secondary_link(), "legacy-cs");
        assert!(!page.contains("theme-stylesheet-secondary"));
    }

    #[test]
    fn test_bind_skips_missing_slots() {
        let mut page = PageModel::new("/topic.html").with_container("html-footer");
        let bound = PageSlots::default().bind(&mut page);

        assert_eq!(bound.primary_link(), None);
        assert_eq!(bound.fragments().len(), 1);
        assert_eq!(bound.fragments()[0].container_id, "html-footer");
    }
}
