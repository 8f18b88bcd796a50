//! Page-lifecycle controller.
//!
//! [`ThemeController`] owns everything one page load needs: the asset
//! source, the page, the saved-selection store and the session
//! [`ThemeContext`]. Hosts call [`initialize`](ThemeController::initialize)
//! once and [`select`](ThemeController::select) for every change the user
//! makes in the theme selector.
//!
//! All methods take `&self`, so a controller behind an `Arc` can be driven
//! from several tasks. Each apply carries a cancellation token and starting
//! a new one cancels the previous token: the most recently started switch
//! is the one that ends up on the page.

use crate::applier::{ApplyOutcome, ApplySettings, ThemeApplier};
use crate::catalog::{CatalogConfig, DisplayNames, ThemeDiscovery};
use crate::model::ThemeCatalog;
use crate::page::{Page, PageSlots, SelectorOption, is_landing_path};
use crate::persistence::{KeyValueStore, THEME_STORAGE_KEY, ThemePreferences};
use crate::source::AssetSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub mod context;

pub use context::ThemeContext;
use context::lock_context;

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub catalog: CatalogConfig,
    pub slots: PageSlots,
    pub apply: ApplySettings,
    pub display_names: DisplayNames,
    pub storage_key: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            slots: PageSlots::default(),
            apply: ApplySettings::default(),
            display_names: DisplayNames::default(),
            storage_key: THEME_STORAGE_KEY.to_string(),
        }
    }
}

struct InFlight {
    id: u64,
    token: CancellationToken,
}

pub struct ThemeController<S, P, K>
where
    S: AssetSource + ?Sized,
    P: Page,
    K: KeyValueStore,
{
    discovery: ThemeDiscovery<S>,
    applier: ThemeApplier<S>,
    page: Mutex<P>,
    context: StdMutex<ThemeContext>,
    preferences: ThemePreferences<K>,
    display_names: DisplayNames,
    in_flight: StdMutex<Option<InFlight>>,
    next_switch: AtomicU64,
}

impl<S, P, K> ThemeController<S, P, K>
where
    S: AssetSource + ?Sized,
    P: Page,
    K: KeyValueStore,
{
    /// Binds the page slots and prepares an empty session.
    ///
    /// Slot validation happens here, once; the secondary stylesheet link is
    /// created if the page has none.
    pub fn new(source: Arc<S>, mut page: P, store: K, settings: ControllerSettings) -> Self {
        let slots = settings.slots.bind(&mut page);
        let is_landing = is_landing_path(&page.location());

        Self {
            discovery: ThemeDiscovery::new(source.clone(), settings.catalog),
            applier: ThemeApplier::new(source, slots, settings.apply),
            page: Mutex::new(page),
            context: StdMutex::new(ThemeContext::new(is_landing)),
            preferences: ThemePreferences::new(store, &settings.storage_key),
            display_names: settings.display_names,
            in_flight: StdMutex::new(None),
            next_switch: AtomicU64::new(0),
        }
    }

    /// Runs the page-load sequence: discover themes, restore the saved
    /// selection, populate the selector and apply the selected theme.
    pub async fn initialize(&self) -> ApplyOutcome {
        log::info!("Initializing theme controller");

        let catalog = self.discovery.discover().await;
        let current = self.preferences.resolve(&catalog).await;
        {
            let mut context = lock_context(&self.context);
            context.catalog = catalog.clone();
            context.current_theme = current.clone();
        }

        {
            let mut page = self.page.lock().await;
            self.populate_selector(&mut *page, &catalog, &current);
        }

        let outcome = self.apply(&current).await;
        log::info!("Theme controller ready. Themes: {:?}", catalog.sorted_ids());
        outcome
    }

    /// Handles a selection made in the theme selector: persist, then apply.
    ///
    /// The choice is saved before the apply starts, so stored selections
    /// follow the order in which the user made them even when an older
    /// apply finishes last. Ids outside the catalog are not saved.
    pub async fn select(&self, theme_id: &str) -> ApplyOutcome {
        let known = lock_context(&self.context).catalog.contains(theme_id);
        if known {
            if let Err(e) = self.preferences.save(theme_id).await {
                log::warn!("Failed to save theme selection: {e}");
            }
        }
        self.apply(theme_id).await
    }

    /// Applies a theme without persisting it.
    ///
    /// An unknown id returns before registering a switch, so it never
    /// cancels an apply that is still in flight.
    pub async fn apply(&self, theme_id: &str) -> ApplyOutcome {
        if !lock_context(&self.context).catalog.contains(theme_id) {
            log::error!("Theme data not found: {theme_id}");
            return ApplyOutcome::UnknownTheme {
                theme_id: theme_id.to_string(),
            };
        }

        let (switch_id, token) = self.begin_switch();
        let outcome = self
            .applier
            .apply(&self.page, &self.context, theme_id, &token)
            .await;
        self.finish_switch(switch_id);
        outcome
    }

    pub fn current_theme(&self) -> String {
        lock_context(&self.context).current_theme.clone()
    }

    pub fn catalog(&self) -> ThemeCatalog {
        lock_context(&self.context).catalog.clone()
    }

    pub fn is_landing(&self) -> bool {
        lock_context(&self.context).is_landing
    }

    pub fn has_cached_descriptions(&self, theme_id: &str) -> bool {
        lock_context(&self.context).descriptions.contains(theme_id)
    }

    pub fn page(&self) -> &Mutex<P> {
        &self.page
    }

    pub fn preferences(&self) -> &ThemePreferences<K> {
        &self.preferences
    }

    pub fn into_page(self) -> P {
        self.page.into_inner()
    }

    fn populate_selector(&self, page: &mut P, catalog: &ThemeCatalog, current: &str) {
        let slots = self.applier.slots();
        let selector = slots.selector();
        if !page.contains(selector) {
            page.create_selector(selector, slots.selector_panel_class(), catalog.len());
        }

        let options = catalog
            .sorted_ids()
            .into_iter()
            .map(|id| SelectorOption {
                label: self.display_names.display_name(&id),
                selected: id == current,
                value: id,
            })
            .collect();
        if let Err(e) = page.set_selector_options(selector, options) {
            log::warn!("Theme selector not populated: {e}");
        }
    }

    /// Registers a new switch and cancels the one still in flight.
    fn begin_switch(&self) -> (u64, CancellationToken) {
        let id = self.next_switch.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(InFlight {
                id,
                token: token.clone(),
            });
        if let Some(previous) = previous {
            log::debug!("Cancelling theme switch #{} in favour of #{id}", previous.id);
            previous.token.cancel();
        }
        (id, token)
    }

    fn finish_switch(&self, id: u64) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.as_ref().is_some_and(|current| current.id == id) {
            *in_flight = None;
        }
    }
}
