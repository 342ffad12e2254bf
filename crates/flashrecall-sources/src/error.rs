//! Story source error types.

use thiserror::Error;

/// Errors that can occur while loading a story catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The catalog file or URL does not exist.
    #[error("story catalog not found: {0}")]
    NotFound(String),

    /// The server returned an error response.
    #[error("HTTP error {status} from {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// The catalog could not be parsed.
    #[error("failed to parse story catalog from {location}: {message}")]
    Parse { location: String, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}
