//! Unified error types for cleanpage.
//!
//! Every variant renders with a stable upper-case code prefix so the
//! message can be surfaced verbatim on a load state or a tool result.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the cleanpage workspace.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown URL kind).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Storage endpoint, project, or container is not configured.
    #[error("NOT_CONFIGURED: {0}")]
    NotConfigured(String),

    /// Container or item cannot be addressed.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// No cache entry found for the given hash.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// The sanitizer rejected a document or fragment.
    #[error("SANITIZE_FAILED: {0}")]
    SanitizeFailed(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotConfigured(msg) => (-32000, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::NotFound(msg) => (-32002, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::SanitizeFailed(msg) => (-32013, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
