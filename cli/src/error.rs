use engine::common::{SourceError, StoreError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a `forumstyle` command before or after the theme
/// lifecycle runs.
///
/// The lifecycle itself never fails; these cover the host around it:
/// configuration, the page skeleton, the asset source and output.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Asset Source Error: {0}")]
    Source(#[from] SourceError),

    #[error("Storage Error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to read page skeleton {path}: {source}")]
    Skeleton {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid page skeleton {path}: {reason}")]
    InvalidSkeleton { path: PathBuf, reason: String },

    #[error("Output Error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Logger Error: {0}")]
    Logger(String),
}

impl From<log::SetLoggerError> for AppError {
    fn from(err: log::SetLoggerError) -> Self {
        AppError::Logger(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = AppError::Config("site.base_url is empty".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration Error: site.base_url is empty"
        );

        let error: AppError = StoreError::Unavailable("no home".to_string()).into();
        assert!(error.to_string().starts_with("Storage Error:"));
    }
}
