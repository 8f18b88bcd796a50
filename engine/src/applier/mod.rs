//! Applying a theme to a page.
//!
//! One apply runs these steps in order:
//!
//! 1. on the landing page, drop descriptions injected by the previous theme
//! 2. swap the primary stylesheet and wait for its load signal
//! 3. swap the secondary stylesheet, or clear it when the theme has none
//! 4. load fragments and forum descriptions concurrently
//! 5. record the current theme and update the selector
//!
//! Every page write checks the apply's cancellation token first, so an
//! apply overtaken by a newer one stops touching the page.

use crate::controller::context::{ThemeContext, lock_context};
use crate::model::{SECONDARY_STYLESHEET_FILE, ThemeDescriptor};
use crate::page::{BoundSlots, Page};
use crate::source::AssetSource;
use futures::future::join_all;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub mod descriptions;
pub mod fragments;
pub mod report;

pub use descriptions::DescriptionCache;
pub use fragments::{has_container_wrapper, wrap_fragment};
pub use report::{
    ApplyOutcome, ApplyReport, DescriptionReport, FragmentReport, FragmentStatus, StylesheetLoad,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySettings {
    /// Upper bound for a stylesheet load signal.
    pub stylesheet_load_timeout: Duration,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            stylesheet_load_timeout: Duration::from_millis(5000),
        }
    }
}

/// A newer apply cancelled this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Superseded;

/// Runs `f` on the page unless `token` was cancelled.
async fn write_page<P, R>(
    page: &Mutex<P>,
    token: &CancellationToken,
    f: impl FnOnce(&mut P) -> R,
) -> Result<R, Superseded>
where
    P: Page,
{
    let mut guard = page.lock().await;
    if token.is_cancelled() {
        return Err(Superseded);
    }
    Ok(f(&mut *guard))
}

pub struct ThemeApplier<S: AssetSource + ?Sized> {
    source: Arc<S>,
    slots: BoundSlots,
    settings: ApplySettings,
}

impl<S: AssetSource + ?Sized> ThemeApplier<S> {
    pub fn new(source: Arc<S>, slots: BoundSlots, settings: ApplySettings) -> Self {
        Self {
            source,
            slots,
            settings,
        }
    }

    pub fn slots(&self) -> &BoundSlots {
        &self.slots
    }

    /// Applies `theme_id` to `page`.
    ///
    /// Unknown themes are logged and leave the page untouched. Missing
    /// containers, headings and assets are skipped one by one; nothing here
    /// returns an error.
    pub async fn apply<P: Page>(
        &self,
        page: &Mutex<P>,
        context: &StdMutex<ThemeContext>,
        theme_id: &str,
        token: &CancellationToken,
    ) -> ApplyOutcome {
        let (descriptor, is_landing) = {
            let context = lock_context(context);
            match context.catalog.get(theme_id) {
                Some(descriptor) => (descriptor.clone(), context.is_landing),
                None => {
                    log::error!("Theme data not found: {theme_id}");
                    return ApplyOutcome::UnknownTheme {
                        theme_id: theme_id.to_string(),
                    };
                }
            }
        };

        log::info!("Applying theme: {theme_id}");
        let mut report = ApplyReport::new(theme_id);
        match self
            .run(page, context, &descriptor, is_landing, token, &mut report)
            .await
        {
            Ok(()) => {
                log::info!("Theme \"{theme_id}\" applied");
                ApplyOutcome::Applied(report)
            }
            Err(Superseded) => {
                log::info!("Theme \"{theme_id}\" superseded by a newer switch");
                ApplyOutcome::Superseded(report)
            }
        }
    }

    async fn run<P: Page>(
        &self,
        page: &Mutex<P>,
        context: &StdMutex<ThemeContext>,
        descriptor: &ThemeDescriptor,
        is_landing: bool,
        token: &CancellationToken,
        report: &mut ApplyReport,
    ) -> Result<(), Superseded> {
        if is_landing {
            let class = self.slots.description_class();
            report.descriptions_removed = write_page(page, token, |p| p.remove_descriptions(class))
                .await?
                .len();
        }

        report.main_stylesheet = match self.slots.primary_link() {
            Some(link) => {
                self.swap_stylesheet(page, link, &descriptor.main_stylesheet, token)
                    .await?
            }
            None => StylesheetLoad::Skipped,
        };

        let secondary_link = self.slots.secondary_link();
        report.secondary_stylesheet = if self.source.probe(&descriptor.secondary_stylesheet).await {
            self.swap_stylesheet(page, secondary_link, &descriptor.secondary_stylesheet, token)
                .await?
        } else {
            let cleared =
                write_page(page, token, |p| p.set_stylesheet_href(secondary_link, None)).await?;
            match cleared {
                Ok(()) => {
                    log::info!(
                        "{SECONDARY_STYLESHEET_FILE} not found for theme \"{}\", secondary stylesheet disabled",
                        descriptor.id
                    );
                    StylesheetLoad::Cleared
                }
                Err(e) => {
                    log::warn!("Secondary stylesheet not cleared: {e}");
                    StylesheetLoad::Skipped
                }
            }
        };

        let (fragments, descriptions) = tokio::join!(
            self.load_fragments(page, descriptor, token),
            self.load_descriptions(page, context, descriptor, is_landing, token),
        );
        report.fragments = fragments?;
        report.descriptions = descriptions?;

        let selector = self.slots.selector();
        write_page(page, token, |p| {
            lock_context(context).current_theme = descriptor.id.clone();
            if let Err(e) = p.set_selector_value(selector, &descriptor.id) {
                log::debug!("Selector not updated: {e}");
            }
        })
        .await
    }

    /// Points `link_id` at `href` and waits for the stylesheet's load signal.
    ///
    /// The wait always ends: a failed probe or the timeout both resolve it.
    async fn swap_stylesheet<P: Page>(
        &self,
        page: &Mutex<P>,
        link_id: &str,
        href: &str,
        token: &CancellationToken,
    ) -> Result<StylesheetLoad, Superseded> {
        let swapped = write_page(page, token, |p| p.set_stylesheet_href(link_id, Some(href))).await?;
        if let Err(e) = swapped {
            log::warn!("Stylesheet {href} not applied: {e}");
            return Ok(StylesheetLoad::Skipped);
        }

        let timeout = self.settings.stylesheet_load_timeout;
        let outcome = match tokio::time::timeout(timeout, self.source.probe(href)).await {
            Ok(true) => {
                log::info!("Stylesheet loaded: {href}");
                StylesheetLoad::Loaded
            }
            Ok(false) => {
                log::error!("Failed to load stylesheet: {href}");
                StylesheetLoad::Failed
            }
            Err(_) => {
                log::warn!("Stylesheet {href} gave no load signal within {timeout:?}");
                StylesheetLoad::TimedOut
            }
        };
        Ok(outcome)
    }

    async fn load_fragments<P: Page>(
        &self,
        page: &Mutex<P>,
        descriptor: &ThemeDescriptor,
        token: &CancellationToken,
    ) -> Result<Vec<FragmentReport>, Superseded> {
        let fetches = self.slots.fragments().iter().map(|slot| async move {
            let path = descriptor.fragment_path(&slot.file);
            let fetched = self.source.fetch(&path).await;
            (slot, path, fetched)
        });
        let fetched = join_all(fetches).await;

        write_page(page, token, |p| {
            fetched
                .into_iter()
                .map(|(slot, path, result)| fragments::inject_fragment(p, slot, &path, result))
                .collect()
        })
        .await
    }

    async fn load_descriptions<P: Page>(
        &self,
        page: &Mutex<P>,
        context: &StdMutex<ThemeContext>,
        descriptor: &ThemeDescriptor,
        is_landing: bool,
        token: &CancellationToken,
    ) -> Result<DescriptionReport, Superseded> {
        if !is_landing {
            return Ok(DescriptionReport::default());
        }
        let Some(manifest_path) = descriptor.description_manifest.as_deref() else {
            return Ok(DescriptionReport::default());
        };

        let cached = lock_context(context).descriptions.get(&descriptor.id);
        let manifest = match cached {
            Some(manifest) => {
                log::debug!("Using cached descriptions for theme \"{}\"", descriptor.id);
                manifest
            }
            None => {
                let fetched =
                    descriptions::fetch_manifest(&*self.source, &descriptor.id, manifest_path)
                        .await;
                let Some(manifest) = fetched else {
                    return Ok(DescriptionReport::default());
                };
                let manifest = Arc::new(manifest);
                lock_context(context)
                    .descriptions
                    .insert(&descriptor.id, manifest.clone());
                manifest
            }
        };

        write_page(page, token, |p| {
            descriptions::insert_descriptions(p, &self.slots, &manifest)
        })
        .await
    }
}
