//! Per-load options.

use cleanpage_core::AppConfig;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_INITIAL_CHUNK_CHARS: usize = 50_000;
pub const DEFAULT_CHUNK_CHARS: usize = 25_000;
pub const DEFAULT_MAX_CACHE_AGE: Duration = Duration::from_secs(30 * 60);

/// Observer of progress fractions in `[0, 1]`.
///
/// A panic raised by the callback is caught and discarded; it never
/// affects the load.
#[derive(Clone)]
pub struct ProgressObserver(Arc<dyn Fn(f64) + Send + Sync>);

impl ProgressObserver {
    pub fn new(f: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn notify(&self, progress: f64) {
        if catch_unwind(AssertUnwindSafe(|| (self.0)(progress))).is_err() {
            tracing::debug!(progress, "progress observer panicked; ignoring");
        }
    }
}

impl fmt::Debug for ProgressObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProgressObserver(..)")
    }
}

/// Options for one load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Container holding the item; falls back to the loader default.
    pub container_id: Option<String>,
    /// Keep `<script>` elements. Part of the cache key.
    pub allow_unsafe_scripts: bool,
    /// Sanitize large items in chunks with a scheduler yield between them.
    pub progressive: bool,
    /// Characters sanitized before the first yield.
    pub initial_chunk_chars: usize,
    /// Characters sanitized per later step.
    pub chunk_chars: usize,
    /// Cached results at least this old are refetched.
    pub max_cache_age: Duration,
    pub on_progress: Option<ProgressObserver>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            container_id: None,
            allow_unsafe_scripts: false,
            progressive: false,
            initial_chunk_chars: DEFAULT_INITIAL_CHUNK_CHARS,
            chunk_chars: DEFAULT_CHUNK_CHARS,
            max_cache_age: DEFAULT_MAX_CACHE_AGE,
            on_progress: None,
        }
    }
}

impl LoadOptions {
    /// Defaults taken from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            progressive: config.progressive,
            initial_chunk_chars: config.initial_chunk_chars,
            chunk_chars: config.chunk_chars,
            max_cache_age: config.max_cache_age(),
            ..Default::default()
        }
    }

    pub fn container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn allow_unsafe_scripts(mut self, allow: bool) -> Self {
        self.allow_unsafe_scripts = allow;
        self
    }

    pub fn progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }

    pub fn chunks(mut self, initial_chunk_chars: usize, chunk_chars: usize) -> Self {
        self.initial_chunk_chars = initial_chunk_chars;
        self.chunk_chars = chunk_chars;
        self
    }

    pub fn max_cache_age(mut self, max_cache_age: Duration) -> Self {
        self.max_cache_age = max_cache_age;
        self
    }

    pub fn on_progress(mut self, f: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(ProgressObserver::new(f));
        self
    }

    /// Whether chunking applies to a text of `total` bytes.
    ///
    /// Items no larger than one initial plus one regular chunk are
    /// sanitized in a single pass.
    pub fn chunking_applies(&self, total: usize) -> bool {
        self.progressive && total > self.initial_chunk_chars.saturating_add(self.chunk_chars)
    }
}
