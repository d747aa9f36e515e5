//! Observable snapshots of a load.

use serde::{Deserialize, Serialize};

/// One snapshot of a load, owned by its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadState {
    /// Sanitized content accumulated so far.
    pub html: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Fraction of the raw text sanitized, in `[0, 1]`.
    pub progress: f64,
    /// Length of the raw text in bytes; 0 until it has been fetched.
    pub total_bytes: usize,
}

impl LoadState {
    /// Nothing requested; the terminal state of a no-op load.
    pub fn idle() -> Self {
        Self { html: String::new(), loading: false, error: None, progress: 0.0, total_bytes: 0 }
    }

    pub fn loading() -> Self {
        Self { loading: true, ..Self::idle() }
    }

    pub(crate) fn partial(html: String, progress: f64, total_bytes: usize) -> Self {
        Self { html, loading: true, error: None, progress, total_bytes }
    }

    pub(crate) fn complete(html: String, total_bytes: usize) -> Self {
        Self { html, loading: false, error: None, progress: 1.0, total_bytes }
    }

    pub(crate) fn failed(message: String, total_bytes: usize) -> Self {
        Self { error: Some(message), total_bytes, ..Self::idle() }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::idle()
    }
}
