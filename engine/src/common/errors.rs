use thiserror::Error;

/// Errors raised while talking to an asset source.
///
/// Every theme asset, the theme listing and the description manifests are
/// read through an [`AssetSource`](crate::source::AssetSource). None of these
/// errors is fatal for the page lifecycle: discovery falls back to the known
/// theme list, fragment slots are cleared and manifests are skipped.
///
/// # Error Categories
///
/// ## Client Configuration Errors
/// - [`ClientCreation`] - HTTP client initialization failures
/// - [`InvalidUrl`] - Base URL or asset path that cannot be resolved
///
/// ## Request Execution Errors
/// - [`Transport`] - The request never produced a response
/// - [`Status`] - The listing endpoint answered with a non-success status
/// - [`InvalidResponse`] - A body that does not have the expected shape
///
/// ## Local Checkout Errors
/// - [`Io`] - File system failures of the local source
///
/// # Examples
///
/// ```no_run
/// use engine::common::errors::SourceError;
///
/// fn log_source_error(error: &SourceError) {
///     match error {
///         SourceError::Status { url, status } => {
///             log::warn!("Listing rejected: url={url}, status={status}");
///         }
///         SourceError::Transport { url, reason } => {
///             log::error!("Transport failure: url={url}, reason={reason}");
///         }
///         other => log::error!("Source error: {other}"),
///     }
/// }
/// ```
///
/// [`ClientCreation`]: SourceError::ClientCreation
/// [`InvalidUrl`]: SourceError::InvalidUrl
/// [`Transport`]: SourceError::Transport
/// [`Status`]: SourceError::Status
/// [`InvalidResponse`]: SourceError::InvalidResponse
/// [`Io`]: SourceError::Io
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP client initialization failed.
    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    /// A URL could not be built from the configured base and the asset path.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request failed before a response was received.
    ///
    /// Connection refused, DNS failures and timeouts all land here.
    #[error("Request failed: {url} - {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Received response doesn't match expected format.
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// Local file system failure.
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised when the page does not honour its element contract.
///
/// The applier logs these and skips the affected step; the remaining
/// fragments and descriptions are still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// No element with the requested id exists on the page.
    #[error("Element #{id} not found on the page")]
    MissingElement { id: String },

    /// The forum element exists but has no heading to anchor a description.
    #[error("Heading <{tag}> not found in forum '{forum_id}'")]
    MissingHeading { forum_id: String, tag: String },

    /// The element exists but is not a stylesheet link.
    #[error("Element #{id} is not a stylesheet link")]
    NotAStylesheet { id: String },
}

/// Errors of the durable key-value stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file '{path}' is corrupted: {reason}")]
    Corrupted { path: String, reason: String },

    #[error("Storage location unavailable: {0}")]
    Unavailable(String),
}

/// Validation errors for theme identifiers.
///
/// Theme ids come from a remote directory listing and end up inside asset
/// paths, so names that could leave the themes folder are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeValidationError {
    #[error("Invalid theme id '{id}': {reason}")]
    InvalidThemeId { id: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display_includes_url() {
        let error = SourceError::Status {
            url: "https://api.github.com/repos/a/b/contents/themes".to_string(),
            status: 403,
        };
        let message = error.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("contents/themes"));
    }
}
