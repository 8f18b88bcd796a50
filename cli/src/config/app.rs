use super::{
    LoggingConfig, page::PageConfig, site::SiteConfig, site::StorageConfig,
    validation::ConfigValidationError,
};
use engine::applier::ApplySettings;
use engine::catalog::{DEFAULT_KNOWN_THEMES, DisplayNames, ThemeIdValidator, Validator};
use engine::common::ThemeValidationError;
use engine::model::DEFAULT_THEMES_ROOT;
use engine::persistence::THEME_STORAGE_KEY;
use engine::{CatalogConfig, ControllerSettings};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_STYLESHEET_LOAD_TIMEOUT_MS: u64 = 5000;
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
const MIN_STYLESHEET_LOAD_TIMEOUT_MS: u64 = 1;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    catalog: CatalogSection,
    #[serde(default)]
    page: PageConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    apply: ApplySection,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CatalogSection {
    themes_root: Option<String>,
    known_themes: Option<Vec<String>>,
    display_names: Option<HashMap<String, String>>,
    fragment_roots: Option<HashMap<String, String>>,
    descriptions_enabled: Option<bool>,
}

impl CatalogSection {
    pub fn themes_root(&self) -> &str {
        self.themes_root.as_deref().unwrap_or(DEFAULT_THEMES_ROOT)
    }

    pub fn known_themes(&self) -> Vec<String> {
        self.known_themes.clone().unwrap_or_else(|| {
            DEFAULT_KNOWN_THEMES
                .iter()
                .map(|name| name.to_string())
                .collect()
        })
    }

    pub fn display_names(&self) -> DisplayNames {
        DisplayNames::new(self.display_names.clone().unwrap_or_default())
    }

    pub fn fragment_roots(&self) -> HashMap<String, String> {
        self.fragment_roots.clone().unwrap_or_default()
    }

    pub fn descriptions_enabled(&self) -> bool {
        self.descriptions_enabled.unwrap_or(true)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApplySection {
    stylesheet_load_timeout_ms: Option<u64>,
}

impl ApplySection {
    pub fn stylesheet_load_timeout_ms(&self) -> u64 {
        self.stylesheet_load_timeout_ms
            .unwrap_or(DEFAULT_STYLESHEET_LOAD_TIMEOUT_MS)
    }
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if self.site.base_url().trim().is_empty() {
            errors.push(ConfigValidationError::EmptyBaseUrl);
        }

        if self.site.request_timeout_secs() < MIN_REQUEST_TIMEOUT_SECS {
            errors.push(ConfigValidationError::RequestTimeout {
                configured: self.site.request_timeout_secs(),
                min_limit: MIN_REQUEST_TIMEOUT_SECS,
            });
        }

        if self.apply.stylesheet_load_timeout_ms() < MIN_STYLESHEET_LOAD_TIMEOUT_MS {
            errors.push(ConfigValidationError::StylesheetLoadTimeout {
                configured: self.apply.stylesheet_load_timeout_ms(),
                min_limit: MIN_STYLESHEET_LOAD_TIMEOUT_MS,
            });
        }

        let validator = ThemeIdValidator;
        for name in self.catalog.known_themes() {
            if let Err(ThemeValidationError::InvalidThemeId { reason, .. }) =
                validator.validate(name.as_str())
            {
                errors.push(ConfigValidationError::KnownTheme { name, reason });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn catalog(&self) -> &CatalogSection {
        &self.catalog
    }

    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn apply(&self) -> &ApplySection {
        &self.apply
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            themes_root: self.catalog.themes_root().to_string(),
            known_themes: self.catalog.known_themes(),
            fragment_roots: self.catalog.fragment_roots(),
            descriptions_enabled: self.catalog.descriptions_enabled(),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            catalog: self.catalog_config(),
            slots: self.page.slots(),
            apply: ApplySettings {
                stylesheet_load_timeout: Duration::from_millis(
                    self.apply.stylesheet_load_timeout_ms(),
                ),
            },
            display_names: self.catalog.display_names(),
            storage_key: THEME_STORAGE_KEY.to_string(),
        }
    }
}
