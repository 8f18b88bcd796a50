use super::{DescriptionElement, FORUM_DATA_ATTRIBUTE, Page, SelectorOption};
use crate::common::errors::PageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesheetLink {
    pub id: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub tag: String,
    pub text: String,
}

/// A forum row of the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumSection {
    pub id: String,
    pub heading: Option<Heading>,
    /// Elements following the heading, in document order.
    #[serde(default)]
    pub descriptions: Vec<DescriptionElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPanel {
    pub class: String,
    pub theme_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub id: String,
    pub panel: Option<SelectorPanel>,
    #[serde(default)]
    pub options: Vec<SelectorOption>,
    pub value: Option<String>,
}

/// In-memory document holding exactly the parts of a forum page the
/// theme engine reads and writes.
///
/// Serializes to JSON so hosts can persist skeletons and print results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageModel {
    pub path: String,
    pub stylesheets: Vec<StylesheetLink>,
    pub containers: BTreeMap<String, String>,
    pub forums: Vec<ForumSection>,
    pub selector: Option<Selector>,
}

impl PageModel {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// The stock forum skeleton: primary stylesheet, the three fragment
    /// containers and one `h3`-headed row per forum id.
    pub fn forum_skeleton(path: &str, forum_ids: &[String]) -> Self {
        let mut page = Self::new(path)
            .with_stylesheet("theme-stylesheet", Some("style.css"))
            .with_container("html-header")
            .with_container("html-footer")
            .with_container("pun-announcement");
        for forum_id in forum_ids {
            page = page.with_forum(forum_id, forum_id);
        }
        page
    }

    pub fn with_stylesheet(mut self, id: &str, href: Option<&str>) -> Self {
        self.stylesheets.push(StylesheetLink {
            id: Some(id.to_string()),
            href: href.map(str::to_string),
        });
        self
    }

    pub fn with_container(mut self, id: &str) -> Self {
        self.containers.insert(id.to_string(), String::new());
        self
    }

    pub fn with_forum(mut self, id: &str, title: &str) -> Self {
        self.forums.push(ForumSection {
            id: id.to_string(),
            heading: Some(Heading {
                tag: "h3".to_string(),
                text: title.to_string(),
            }),
            descriptions: Vec::new(),
        });
        self
    }

    pub fn with_forum_without_heading(mut self, id: &str) -> Self {
        self.forums.push(ForumSection {
            id: id.to_string(),
            heading: None,
            descriptions: Vec::new(),
        });
        self
    }

    pub fn with_selector(mut self, id: &str) -> Self {
        self.selector = Some(Selector {
            id: id.to_string(),
            panel: None,
            options: Vec::new(),
            value: None,
        });
        self
    }

    /// All injected description elements, in document order.
    pub fn descriptions(&self) -> Vec<&DescriptionElement> {
        self.forums
            .iter()
            .flat_map(|forum| forum.descriptions.iter())
            .collect()
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    fn stylesheet_mut(&mut self, link_id: &str) -> Option<&mut StylesheetLink> {
        self.stylesheets
            .iter_mut()
            .find(|link| link.id.as_deref() == Some(link_id))
    }

    fn selector_mut(&mut self, selector_id: &str) -> Result<&mut Selector, PageError> {
        self.selector
            .as_mut()
            .filter(|selector| selector.id == selector_id)
            .ok_or_else(|| PageError::MissingElement {
                id: selector_id.to_string(),
            })
    }
}

impl Page for PageModel {
    fn location(&self) -> String {
        self.path.clone()
    }

    fn contains(&self, id: &str) -> bool {
        self.stylesheets
            .iter()
            .any(|link| link.id.as_deref() == Some(id))
            || self.containers.contains_key(id)
            || self.forums.iter().any(|forum| forum.id == id)
            || self.selector.as_ref().is_some_and(|s| s.id == id)
    }

    fn stylesheet_href(&self, link_id: &str) -> Option<String> {
        self.stylesheets
            .iter()
            .find(|link| link.id.as_deref() == Some(link_id))
            .and_then(|link| link.href.clone())
    }

    fn find_stylesheet_link(&self, fragment: &str) -> Option<String> {
        self.stylesheets
            .iter()
            .filter(|link| link.href.as_deref().is_some_and(|href| href.contains(fragment)))
            .find_map(|link| link.id.clone())
    }

    fn create_stylesheet_link(&mut self, link_id: &str) {
        self.stylesheets.push(StylesheetLink {
            id: Some(link_id.to_string()),
            href: None,
        });
    }

    fn set_stylesheet_href(&mut self, link_id: &str, href: Option<&str>) -> Result<(), PageError> {
        if let Some(link) = self.stylesheet_mut(link_id) {
            link.href = href.map(str::to_string);
            return Ok(());
        }
        if self.contains(link_id) {
            Err(PageError::NotAStylesheet {
                id: link_id.to_string(),
            })
        } else {
            Err(PageError::MissingElement {
                id: link_id.to_string(),
            })
        }
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.containers.get(id).cloned()
    }

    fn set_inner_html(&mut self, id: &str, html: &str) -> Result<(), PageError> {
        match self.containers.get_mut(id) {
            Some(content) => {
                *content = html.to_string();
                Ok(())
            }
            None => Err(PageError::MissingElement { id: id.to_string() }),
        }
    }

    fn remove_descriptions(&mut self, class: &str) -> Vec<String> {
        let mut removed = Vec::new();
        for forum in &mut self.forums {
            forum.descriptions.retain(|element| {
                if element.class == class && !element.forum.is_empty() {
                    log::debug!(
                        "Removed stale description ({FORUM_DATA_ATTRIBUTE}=\"{}\")",
                        element.forum
                    );
                    removed.push(element.forum.clone());
                    false
                } else {
                    true
                }
            });
        }
        removed
    }

    fn insert_description(
        &mut self,
        forum_id: &str,
        heading_tag: &str,
        description: DescriptionElement,
    ) -> Result<(), PageError> {
        let forum = self
            .forums
            .iter_mut()
            .find(|forum| forum.id == forum_id)
            .ok_or_else(|| PageError::MissingElement {
                id: forum_id.to_string(),
            })?;

        let has_heading = forum
            .heading
            .as_ref()
            .is_some_and(|heading| heading.tag.eq_ignore_ascii_case(heading_tag));
        if !has_heading {
            return Err(PageError::MissingHeading {
                forum_id: forum_id.to_string(),
                tag: heading_tag.to_string(),
            });
        }

        forum.descriptions.insert(0, description);
        Ok(())
    }

    fn create_selector(&mut self, selector_id: &str, panel_class: &str, theme_count: usize) {
        self.selector = Some(Selector {
            id: selector_id.to_string(),
            panel: Some(SelectorPanel {
                class: panel_class.to_string(),
                theme_count,
            }),
            options: Vec::new(),
            value: None,
        });
    }

    fn set_selector_options(
        &mut self,
        selector_id: &str,
        options: Vec<SelectorOption>,
    ) -> Result<(), PageError> {
        let selector = self.selector_mut(selector_id)?;
        selector.value = options
            .iter()
            .find(|option| option.selected)
            .or_else(|| options.first())
            .map(|option| option.value.clone());
        selector.options = options;
        Ok(())
    }

    fn set_selector_value(&mut self, selector_id: &str, value: &str) -> Result<(), PageError> {
        let selector = self.selector_mut(selector_id)?;
        for option in &mut selector.options {
            option.selected = option.value == value;
        }
        selector.value = Some(value.to_string());
        Ok(())
    }

    fn selector_value(&self, selector_id: &str) -> Option<String> {
        self.selector
            .as_ref()
            .filter(|selector| selector.id == selector_id)
            .and_then(|selector| selector.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::DESCRIPTION_CLASS;

    fn landing() -> PageModel {
        PageModel::forum_skeleton("/", &["forum1".to_string(), "forum2".to_string()])
            .with_forum_without_heading("forum3")
    }

    #[test]
    fn test_stylesheet_hrefs() {
        let mut page = landing();
        assert_eq!(page.stylesheet_href("theme-stylesheet").as_deref(), Some("style.css"));

        page.create_stylesheet_link("theme-stylesheet-secondary");
        page.set_stylesheet_href("theme-stylesheet-secondary", Some("themes/a/style_cs.css"))
            .unwrap();
        assert_eq!(
            page.find_stylesheet_link("style_cs.css").as_deref(),
            Some("theme-stylesheet-secondary")
        );

        page.set_stylesheet_href("theme-stylesheet-secondary", None).unwrap();
        assert_eq!(page.stylesheet_href("theme-stylesheet-secondary"), None);

        assert_eq!(
            page.set_stylesheet_href("html-header", Some("x.css")),
            Err(PageError::NotAStylesheet {
                id: "html-header".to_string()
            })
        );
        assert!(matches!(
            page.set_stylesheet_href("nope", Some("x.css")),
            Err(PageError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_description_insert_and_remove() {
        let mut page = landing();
        let element =
            |forum: &str, html: &str| DescriptionElement::new(DESCRIPTION_CLASS, forum, html);
        page.insert_description("forum1", "h3", element("forum1", "a")).unwrap();
        page.insert_description("forum1", "H3", element("forum1", "b")).unwrap();

        // The newest insertion sits directly under the heading.
        assert_eq!(page.forums[0].descriptions[0].html, "b");

        assert!(matches!(
            page.insert_description("forum3", "h3", element("forum3", "c")),
            Err(PageError::MissingHeading { .. })
        ));
        assert!(matches!(
            page.insert_description("forum9", "h3", element("forum9", "c")),
            Err(PageError::MissingElement { .. })
        ));

        let removed = page.remove_descriptions(DESCRIPTION_CLASS);
        assert_eq!(removed, vec!["forum1".to_string(), "forum1".to_string()]);
        assert!(page.descriptions().is_empty());
    }

    #[test]
    fn test_selector_value_tracks_options() {
        let mut page = landing();
        assert!(page.set_selector_value("theme-select", "a").is_err());

        page.create_selector("theme-select", "theme-demo-panel", 2);
        page.set_selector_options(
            "theme-select",
            vec![
                SelectorOption {
                    value: "a".to_string(),
                    label: "A".to_string(),
                    selected: false,
                },
                SelectorOption {
                    value: "b".to_string(),
                    label: "B".to_string(),
                    selected: true,
                },
            ],
        )
        .unwrap();
        assert_eq!(page.selector_value("theme-select").as_deref(), Some("b"));

        page.set_selector_value("theme-select", "a").unwrap();
        let selector = page.selector().unwrap();
        assert_eq!(selector.value.as_deref(), Some("a"));
        assert!(selector.options[0].selected);
        assert!(!selector.options[1].selected);
    }

    #[test]
    fn test_skeleton_round_trips_through_json() {
        let page = landing();
        let json = serde_json::to_string(&page).unwrap();
        let parsed: PageModel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, page);

        let minimal: PageModel = serde_json::from_str(r#"{"path": "/forum.html"}"#).unwrap();
        assert!(minimal.stylesheets.is_empty());
    }
}
