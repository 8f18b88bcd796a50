use super::report::DescriptionReport;
use crate::model::ForumDescriptionManifest;
use crate::page::{BoundSlots, DescriptionElement, Page};
use crate::source::AssetSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Manifests loaded during this session, keyed by theme id. Never evicted.
#[derive(Debug, Clone, Default)]
pub struct DescriptionCache {
    manifests: HashMap<String, Arc<ForumDescriptionManifest>>,
}

impl DescriptionCache {
    pub fn get(&self, theme_id: &str) -> Option<Arc<ForumDescriptionManifest>> {
        self.manifests.get(theme_id).cloned()
    }

    pub fn insert(&mut self, theme_id: &str, manifest: Arc<ForumDescriptionManifest>) {
        self.manifests.insert(theme_id.to_string(), manifest);
    }

    pub fn contains(&self, theme_id: &str) -> bool {
        self.manifests.contains_key(theme_id)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

/// Fetches and parses a theme's manifest. Every failure is logged and
/// reported as `None`.
pub(crate) async fn fetch_manifest<S: AssetSource + ?Sized>(
    source: &S,
    theme_id: &str,
    path: &str,
) -> Option<ForumDescriptionManifest> {
    let response = match source.fetch(path).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Failed to load descriptions for theme \"{theme_id}\": {e}");
            return None;
        }
    };

    if !response.is_success() {
        if response.status == 404 {
            log::info!("Description manifest not found: {path}");
        } else {
            log::warn!(
                "Failed to load descriptions for theme \"{theme_id}\": status {}",
                response.status
            );
        }
        return None;
    }

    match ForumDescriptionManifest::parse(&response.body) {
        Ok(manifest) => {
            log::info!(
                "Forum descriptions for theme \"{theme_id}\" loaded ({} forums)",
                manifest.len()
            );
            Some(manifest)
        }
        Err(e) => {
            log::error!("Invalid description manifest {path}: {e}");
            None
        }
    }
}

/// Inserts one description per manifest entry under the forum headings.
pub(crate) fn insert_descriptions<P: Page + ?Sized>(
    page: &mut P,
    slots: &BoundSlots,
    manifest: &ForumDescriptionManifest,
) -> DescriptionReport {
    let mut report = DescriptionReport::default();
    for (forum_id, html) in manifest.iter() {
        let element = DescriptionElement::new(slots.description_class(), forum_id, html);
        match page.insert_description(forum_id, slots.heading_tag(), element) {
            Ok(()) => {
                log::debug!("Description added for forum \"{forum_id}\"");
                report.inserted.push(forum_id.to_string());
            }
            Err(e) => {
                log::info!("Description for forum \"{forum_id}\" skipped: {e}");
                report.skipped.push(forum_id.to_string());
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageModel, PageSlots};
    use crate::source::MemoryAssetSource;

    #[tokio::test]
    async fn test_fetch_manifest_outcomes() {
        let source = MemoryAssetSource::new()
            .with_asset("a/descriptions.json", r#"{"forum1": "<p>Rules</p>"}"#)
            .with_asset("b/descriptions.json", "{ broken")
            .with_status("c/descriptions.json", 500);

        let manifest = fetch_manifest(&source, "a", "a/descriptions.json").await;
        assert_eq!(manifest.map(|m| m.len()), Some(1));
        assert!(fetch_manifest(&source, "b", "b/descriptions.json").await.is_none());
        assert!(fetch_manifest(&source, "c", "c/descriptions.json").await.is_none());
        assert!(fetch_manifest(&source, "d", "d/descriptions.json").await.is_none());
    }

    #[test]
    fn test_insert_skips_unknown_forums() {
        let mut page = PageModel::forum_skeleton("/", &["forum1".to_string()])
            .with_forum_without_heading("forum2");
        let slots = PageSlots::default().bind(&mut page);
        let manifest: ForumDescriptionManifest = [
            ("forum1", "<p>Rules</p>"),
            ("forum2", "<p>No heading</p>"),
            ("forum9", "<p>Not on page</p>"),
        ]
        .into_iter()
        .collect();

        let report = insert_descriptions(&mut page, &slots, &manifest);
        assert_eq!(report.inserted, vec!["forum1"]);
        assert_eq!(report.skipped, vec!["forum2", "forum9"]);
        assert_eq!(page.descriptions().len(), 1);
        assert_eq!(page.descriptions()[0].forum, "forum1");
    }

    #[test]
    fn test_cache_keeps_manifests() {
        let mut cache = DescriptionCache::default();
        assert!(cache.is_empty());
        cache.insert("a", Arc::new(ForumDescriptionManifest::default()));
        assert!(cache.contains("a"));
        assert!(cache.get("b").is_none());
    }
}
