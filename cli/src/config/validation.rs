use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("site.base_url is empty")]
    EmptyBaseUrl,
    #[error("Invalid site.request_timeout_secs: {configured} (min: {min_limit})")]
    RequestTimeout { configured: u64, min_limit: u64 },
    #[error("Invalid apply.stylesheet_load_timeout_ms: {configured} (min: {min_limit})")]
    StylesheetLoadTimeout { configured: u64, min_limit: u64 },
    #[error("Invalid theme name in catalog.known_themes: '{name}' ({reason})")]
    KnownTheme { name: String, reason: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::EmptyBaseUrl => "Site base URL is empty!\n\n\
                Please set site.base_url in forumstyle.toml or FORUMSTYLE_SITE__BASE_URL \
                to the root of the published forum site."
                .to_string(),
            ConfigValidationError::RequestTimeout {
                configured,
                min_limit,
            } => {
                format!(
                    "Request timeout too low!\n\n\
                    Your configured value: {configured} seconds\n\
                    Minimum: {min_limit} seconds\n\n\
                    Please update site.request_timeout_secs in forumstyle.toml."
                )
            }
            ConfigValidationError::StylesheetLoadTimeout {
                configured,
                min_limit,
            } => {
                format!(
                    "Stylesheet load timeout too low!\n\n\
                    Your configured value: {configured} ms\n\
                    Minimum: {min_limit} ms\n\n\
                    Please update apply.stylesheet_load_timeout_ms in forumstyle.toml."
                )
            }
            ConfigValidationError::KnownTheme { name, reason } => {
                format!(
                    "Invalid known theme '{name}'!\n\n\
                    {reason}\n\n\
                    Please fix catalog.known_themes in forumstyle.toml."
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
    ValidationError(Vec<ConfigValidationError>),
}
