//! Page abstraction.
//!
//! The engine never reaches for globals: everything it touches on the page
//! goes through [`Page`], and the element ids it uses come from
//! [`PageSlots`], bound once when the controller is built.

use crate::common::errors::PageError;
use serde::{Deserialize, Serialize};

pub mod model;
pub mod slots;

pub use model::PageModel;
pub use slots::{BoundSlots, FragmentSlot, PageSlots};

/// Reserved class of injected forum descriptions.
pub const DESCRIPTION_CLASS: &str = "forum-description";
/// Attribute carrying the forum id on injected descriptions.
pub const FORUM_DATA_ATTRIBUTE: &str = "data-forum";

/// A description element injected after a forum heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionElement {
    pub class: String,
    /// Value of the `data-forum` attribute.
    pub forum: String,
    pub html: String,
}

impl DescriptionElement {
    pub fn new(class: &str, forum: &str, html: &str) -> Self {
        Self {
            class: class.to_string(),
            forum: forum.to_string(),
            html: html.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Operations the engine performs on a page.
///
/// Implementations map these onto a real document; [`PageModel`] keeps the
/// document in memory.
pub trait Page: Send {
    /// Path of the current document, e.g. `/cleanstyle/index.html`.
    fn location(&self) -> String;

    fn contains(&self, id: &str) -> bool;

    fn stylesheet_href(&self, link_id: &str) -> Option<String>;

    /// Id of the first stylesheet link whose href contains `fragment`.
    fn find_stylesheet_link(&self, fragment: &str) -> Option<String>;

    /// Appends an empty stylesheet link to the document head.
    fn create_stylesheet_link(&mut self, link_id: &str);

    /// Points a stylesheet link at `href`; `None` clears the href and
    /// disables the link.
    fn set_stylesheet_href(&mut self, link_id: &str, href: Option<&str>) -> Result<(), PageError>;

    fn inner_html(&self, id: &str) -> Option<String>;

    fn set_inner_html(&mut self, id: &str, html: &str) -> Result<(), PageError>;

    /// Removes every element carrying `class` and a `data-forum` attribute,
    /// returning the forum ids they belonged to.
    fn remove_descriptions(&mut self, class: &str) -> Vec<String>;

    /// Inserts `description` immediately after the `heading_tag` heading of
    /// the forum element `forum_id`.
    fn insert_description(
        &mut self,
        forum_id: &str,
        heading_tag: &str,
        description: DescriptionElement,
    ) -> Result<(), PageError>;

    /// Creates the theme selector inside a panel at the top of the page.
    fn create_selector(&mut self, selector_id: &str, panel_class: &str, theme_count: usize);

    fn set_selector_options(
        &mut self,
        selector_id: &str,
        options: Vec<SelectorOption>,
    ) -> Result<(), PageError>;

    fn set_selector_value(&mut self, selector_id: &str, value: &str) -> Result<(), PageError>;

    fn selector_value(&self, selector_id: &str) -> Option<String>;
}

/// Whether `path` is the landing page, where forum descriptions are shown.
pub fn is_landing_path(path: &str) -> bool {
    path.contains("index.html") || path == "/" || path.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_detection() {
        assert!(is_landing_path("/"));
        assert!(is_landing_path("/cleanstyle/"));
        assert!(is_landing_path("/cleanstyle/index.html"));
        assert!(!is_landing_path("/cleanstyle/viewforum.html"));
        assert!(!is_landing_path(""));
    }
}
