use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Theme id used when nothing was saved or the saved theme disappeared.
pub const DEFAULT_THEME: &str = "default";

/// Root folder of all themes, relative to the site root.
pub const DEFAULT_THEMES_ROOT: &str = "themes";

pub const MAIN_STYLESHEET_FILE: &str = "style.css";
pub const SECONDARY_STYLESHEET_FILE: &str = "style_cs.css";
pub const DESCRIPTION_MANIFEST_FILE: &str = "descriptions.json";

/// Everything needed to apply one theme.
///
/// Descriptors are built during discovery and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub id: String,
    pub main_stylesheet: String,
    pub secondary_stylesheet: String,
    pub description_manifest: Option<String>,
    /// Folder the HTML fragments are read from, always ending with `/`
    /// unless it is the site root (empty string).
    pub fragment_root: String,
}

impl ThemeDescriptor {
    /// Builds the standard layout `<themes_root>/<id>/...`.
    pub fn new(id: &str, themes_root: &str) -> Self {
        let folder = theme_folder(themes_root, id);
        Self {
            id: id.to_string(),
            main_stylesheet: format!("{folder}{MAIN_STYLESHEET_FILE}"),
            secondary_stylesheet: format!("{folder}{SECONDARY_STYLESHEET_FILE}"),
            description_manifest: Some(format!("{folder}{DESCRIPTION_MANIFEST_FILE}")),
            fragment_root: folder,
        }
    }

    pub fn without_description_manifest(mut self) -> Self {
        self.description_manifest = None;
        self
    }

    /// Reads fragments from `root` instead of the theme folder.
    pub fn with_fragment_root(mut self, root: &str) -> Self {
        self.fragment_root = normalize_folder(root);
        self
    }

    pub fn fragment_path(&self, file: &str) -> String {
        format!("{}{}", self.fragment_root, file)
    }
}

fn theme_folder(themes_root: &str, id: &str) -> String {
    let root = themes_root.trim_matches('/');
    if root.is_empty() {
        format!("{id}/")
    } else {
        format!("{root}/{id}/")
    }
}

fn normalize_folder(root: &str) -> String {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// The themes available for the current page load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThemeCatalog {
    themes: HashMap<String, ThemeDescriptor>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, replacing any previous one with the same id.
    pub fn insert(&mut self, descriptor: ThemeDescriptor) {
        self.themes.insert(descriptor.id.clone(), descriptor);
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDescriptor> {
        self.themes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Theme ids in presentation order.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.themes.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ThemeDescriptor> {
        self.themes.values()
    }
}

impl FromIterator<ThemeDescriptor> for ThemeCatalog {
    fn from_iter<I: IntoIterator<Item = ThemeDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}

/// Kind of an entry returned by the contents listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
    /// Symlinks, submodules and anything GitHub may add later.
    #[serde(other)]
    Other,
}

/// One entry of the themes folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
}

impl DirectoryEntry {
    pub fn dir(name: &str) -> Self {
        Self {
            kind: EntryKind::Dir,
            name: name.to_string(),
        }
    }

    pub fn file(name: &str) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.to_string(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Per-forum HTML descriptions of one theme, keyed by forum element id.
///
/// A `BTreeMap` keeps insertion into the page deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForumDescriptionManifest {
    entries: BTreeMap<String, String>,
}

impl ForumDescriptionManifest {
    /// Parses a manifest body.
    ///
    /// The document must be a JSON object. Entries whose value is not a
    /// string are logged and dropped; the rest of the manifest survives.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let serde_json::Value::Object(map) = value else {
            return Err(serde::de::Error::custom(
                "description manifest must be a JSON object",
            ));
        };

        let mut entries = BTreeMap::new();
        for (forum_id, description) in map {
            match description {
                serde_json::Value::String(html) => {
                    entries.insert(forum_id, html);
                }
                other => {
                    log::warn!(
                        "Skipping description for forum '{forum_id}': expected a string, got {other}"
                    );
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, forum_id: &str) -> Option<&str> {
        self.entries.get(forum_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(forum, html)| (forum.as_str(), html.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ForumDescriptionManifest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_paths_follow_theme_layout() {
        let descriptor = ThemeDescriptor::new("cyrodiil", "themes");
        assert_eq!(descriptor.main_stylesheet, "themes/cyrodiil/style.css");
        assert_eq!(descriptor.secondary_stylesheet, "themes/cyrodiil/style_cs.css");
        assert_eq!(
            descriptor.description_manifest.as_deref(),
            Some("themes/cyrodiil/descriptions.json")
        );
        assert_eq!(descriptor.fragment_path("header.html"), "themes/cyrodiil/header.html");
    }

    #[test]
    fn test_fragment_root_override() {
        let root = ThemeDescriptor::new("clean_new", "themes/").with_fragment_root("/");
        assert_eq!(root.fragment_path("footer.html"), "footer.html");

        let shared = ThemeDescriptor::new("clean_new", "themes").with_fragment_root("shared");
        assert_eq!(shared.fragment_path("footer.html"), "shared/footer.html");
    }

    #[test]
    fn test_catalog_sorted_ids_are_lexicographic() {
        let catalog: ThemeCatalog = ["pinot_grigio", "clean_old", "cyrodiil"]
            .into_iter()
            .map(|id| ThemeDescriptor::new(id, DEFAULT_THEMES_ROOT))
            .collect();

        assert_eq!(catalog.sorted_ids(), vec!["clean_old", "cyrodiil", "pinot_grigio"]);
        assert!(catalog.contains("cyrodiil"));
        assert!(!catalog.contains(DEFAULT_THEME));
    }

    #[test]
    fn test_directory_entry_kinds() {
        let entries: Vec<DirectoryEntry> = serde_json::from_str(
            r#"[
                {"type": "dir", "name": "cyrodiil", "sha": "abc"},
                {"type": "file", "name": "README.md"},
                {"type": "symlink", "name": "latest"}
            ]"#,
        )
        .unwrap();

        assert!(entries[0].is_dir());
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[test]
    fn test_manifest_skips_non_string_entries() {
        let manifest = ForumDescriptionManifest::parse(
            r#"{"forum1": "<p>Rules</p>", "forum2": 42, "forum3": "<p>News</p>"}"#,
        )
        .unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("forum1"), Some("<p>Rules</p>"));
        assert_eq!(manifest.get("forum2"), None);
    }

    #[test]
    fn test_manifest_rejects_non_object() {
        assert!(ForumDescriptionManifest::parse(r#"["forum1"]"#).is_err());
        assert!(ForumDescriptionManifest::parse("not json").is_err());
    }
}
