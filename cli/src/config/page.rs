use engine::page::{FragmentSlot, PageSlots};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LANDING_PATH: &str = "/index.html";

/// Page slot ids and the skeleton the lifecycle runs against.
///
/// Unset slot ids keep the [`PageSlots`] defaults.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PageConfig {
    primary_link: Option<String>,
    secondary_link: Option<String>,
    secondary_href_hint: Option<String>,
    fragments: Option<Vec<FragmentSlot>>,
    selector: Option<String>,
    selector_panel_class: Option<String>,
    heading_tag: Option<String>,
    description_class: Option<String>,

    landing_path: Option<String>,
    forum_ids: Option<Vec<String>>,
    /// JSON page model used instead of the generated skeleton.
    skeleton: Option<PathBuf>,
}

impl PageConfig {
    pub fn slots(&self) -> PageSlots {
        let defaults = PageSlots::default();
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        PageSlots {
            primary_link: pick(&self.primary_link, defaults.primary_link),
            secondary_link: pick(&self.secondary_link, defaults.secondary_link),
            secondary_href_hint: pick(&self.secondary_href_hint, defaults.secondary_href_hint),
            fragments: self.fragments.clone().unwrap_or(defaults.fragments),
            selector: pick(&self.selector, defaults.selector),
            selector_panel_class: pick(&self.selector_panel_class, defaults.selector_panel_class),
            heading_tag: pick(&self.heading_tag, defaults.heading_tag),
            description_class: pick(&self.description_class, defaults.description_class),
        }
    }

    pub fn landing_path(&self) -> &str {
        self.landing_path.as_deref().unwrap_or(DEFAULT_LANDING_PATH)
    }

    pub fn forum_ids(&self) -> Vec<String> {
        self.forum_ids.clone().unwrap_or_default()
    }

    pub fn skeleton(&self) -> Option<&Path> {
        self.skeleton.as_deref()
    }
}
