use crate::applier::DescriptionCache;
use crate::model::{DEFAULT_THEME, ThemeCatalog};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session state of one page load.
#[derive(Debug, Clone)]
pub struct ThemeContext {
    pub catalog: ThemeCatalog,
    pub current_theme: String,
    pub descriptions: DescriptionCache,
    /// Forum descriptions are only rendered on the landing page.
    pub is_landing: bool,
}

impl ThemeContext {
    pub fn new(is_landing: bool) -> Self {
        Self {
            catalog: ThemeCatalog::new(),
            current_theme: DEFAULT_THEME.to_string(),
            descriptions: DescriptionCache::default(),
            is_landing,
        }
    }
}

/// Locks the context, recovering the state if a holder panicked.
pub(crate) fn lock_context(context: &Mutex<ThemeContext>) -> MutexGuard<'_, ThemeContext> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}
