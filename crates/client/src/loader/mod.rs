//! Progressive, cached sanitized-HTML loading.
//!
//! ### Fast Path
//! - A fresh cache entry for (container, item, scripts flag) is returned as
//!   a single terminal state; nothing is resolved or fetched.
//!
//! ### Slow Path
//! - Resolve the item's location, fetch the raw text, sanitize it.
//! - In progressive mode, large texts are sanitized in chunks, each one an
//!   independent fragment, with a scheduler yield between chunks.
//! - The cache is written once, after the last chunk.
//!
//! ### Cancellation
//! - Every load takes a `CancellationToken`. Once it fires the load emits
//!   no further states, calls no observer, and writes nothing to the cache.

pub mod chunk;
pub mod options;
pub mod state;

pub use chunk::ChunkPlan;
pub use options::{LoadOptions, ProgressObserver};
pub use state::LoadState;

use crate::fetch::ContentFetcher;
use crate::sanitize::{AmmoniaSanitizer, Sanitizer};
use crate::storage::LocationResolver;
use async_stream::stream;
use cleanpage_core::Error;
use cleanpage_core::cache::{CacheKey, ContentCache, now_millis};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Loads items as sanitized HTML through a shared cache.
#[derive(Clone)]
pub struct SanitizingContentCache {
    cache: Arc<ContentCache>,
    resolver: Arc<dyn LocationResolver>,
    fetcher: Arc<dyn ContentFetcher>,
    sanitizer: Arc<dyn Sanitizer>,
    default_container_id: Option<String>,
}

impl SanitizingContentCache {
    pub fn new(
        cache: Arc<ContentCache>, resolver: Arc<dyn LocationResolver>, fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        Self { cache, resolver, fetcher, sanitizer: Arc::new(AmmoniaSanitizer::new()), default_container_id: None }
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Container used when a load names none.
    pub fn with_default_container(mut self, container_id: impl Into<String>) -> Self {
        self.default_container_id = Some(container_id.into());
        self
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub fn default_container_id(&self) -> Option<&str> {
        self.default_container_id.as_deref()
    }

    /// Start loading `item_id`, producing state snapshots in order.
    ///
    /// A missing item or container yields one idle state and does nothing
    /// else. The stream does no work until polled.
    pub fn load(
        &self, item_id: Option<&str>, options: LoadOptions, cancel: CancellationToken,
    ) -> BoxStream<'static, LoadState> {
        self.start(item_id, options, cancel, true)
    }

    /// Drive a load to its end and return the last state it produced.
    ///
    /// Progress is still reported to the observer, but no intermediate
    /// snapshots are built.
    pub async fn load_to_completion(
        &self, item_id: Option<&str>, options: LoadOptions, cancel: CancellationToken,
    ) -> LoadState {
        let mut states = self.start(item_id, options, cancel, false);
        let mut last = LoadState::idle();
        while let Some(state) = states.next().await {
            last = state;
        }
        last
    }

    fn start(
        &self, item_id: Option<&str>, options: LoadOptions, cancel: CancellationToken, emit_partials: bool,
    ) -> BoxStream<'static, LoadState> {
        let item_id = item_id.filter(|id| !id.is_empty());
        let container_id = options
            .container_id
            .as_deref()
            .or(self.default_container_id.as_deref())
            .filter(|id| !id.is_empty());

        let (Some(item_id), Some(container_id)) = (item_id, container_id) else {
            tracing::debug!("load skipped: no item or container selected");
            return stream::once(async { LoadState::idle() }).boxed();
        };

        let job = LoadJob {
            key: CacheKey::new(container_id, item_id, options.allow_unsafe_scripts),
            options,
            cancel,
            cache: self.cache.clone(),
            resolver: self.resolver.clone(),
            fetcher: self.fetcher.clone(),
            sanitizer: self.sanitizer.clone(),
            emit_partials,
        };
        job.run().boxed()
    }
}

/// One load in flight.
struct LoadJob {
    key: CacheKey,
    options: LoadOptions,
    cancel: CancellationToken,
    cache: Arc<ContentCache>,
    resolver: Arc<dyn LocationResolver>,
    fetcher: Arc<dyn ContentFetcher>,
    sanitizer: Arc<dyn Sanitizer>,
    /// Yield a snapshot after every non-final chunk.
    emit_partials: bool,
}

impl LoadJob {
    fn run(self) -> impl Stream<Item = LoadState> + Send + 'static {
        stream! {
            let allow_scripts = self.key.allow_unsafe_scripts;

            if let Some(entry) = self.cache.get_fresh(&self.key, self.options.max_cache_age, now_millis()) {
                if self.abandoned() {
                    return;
                }
                self.report(1.0);
                yield LoadState::complete(entry.sanitized_content, 0);
                return;
            }

            if self.abandoned() {
                return;
            }
            self.report(0.0);
            yield LoadState::loading();

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = self.retrieve() => Some(result),
            };
            let raw = match fetched {
                Some(Ok(raw)) if !self.abandoned() => raw,
                Some(Err(e)) if !self.abandoned() => {
                    tracing::warn!(key = %self.key, error = %e, "load failed");
                    yield LoadState::failed(e.to_string(), 0);
                    return;
                }
                _ => return,
            };

            let total = raw.len();

            if !self.options.chunking_applies(total) {
                let sanitized = self.sanitizer.sanitize(&raw, allow_scripts);
                if self.abandoned() {
                    return;
                }
                let clean = match sanitized {
                    Ok(clean) => clean,
                    Err(e) => {
                        tracing::warn!(key = %self.key, error = %e, "sanitize failed");
                        yield LoadState::failed(e.to_string(), total);
                        return;
                    }
                };
                self.cache.insert(self.key.clone(), clean.clone());
                self.report(1.0);
                yield LoadState::complete(clean, total);
                return;
            }

            tracing::debug!(
                key = %self.key,
                total,
                initial = self.options.initial_chunk_chars,
                chunk = self.options.chunk_chars,
                "progressive sanitize"
            );

            let mut html = String::with_capacity(total);
            for (index, range) in ChunkPlan::new(&raw, self.options.initial_chunk_chars, self.options.chunk_chars).enumerate() {
                if index > 0 {
                    tokio::task::yield_now().await;
                }
                if self.abandoned() {
                    return;
                }

                let sanitized = self.sanitizer.sanitize(&raw[range.clone()], allow_scripts);
                if self.abandoned() {
                    return;
                }
                let fragment = match sanitized {
                    Ok(fragment) => fragment,
                    Err(e) => {
                        tracing::warn!(key = %self.key, error = %e, chunk = index, "sanitize failed");
                        yield LoadState::failed(e.to_string(), total);
                        return;
                    }
                };
                html.push_str(&fragment);

                if range.end < total {
                    let progress = range.end as f64 / total as f64;
                    self.report(progress);
                    if self.emit_partials {
                        yield LoadState::partial(html.clone(), progress, total);
                    }
                }
            }

            if self.abandoned() {
                return;
            }
            self.cache.insert(self.key.clone(), html.clone());
            self.report(1.0);
            yield LoadState::complete(html, total);
        }
    }

    async fn retrieve(&self) -> Result<String, Error> {
        let location = self
            .resolver
            .resolve(&self.key.container_id, &self.key.item_id)
            .await?;
        tracing::debug!(key = %self.key, %location, "fetching");
        self.fetcher.fetch_text(&location).await
    }

    fn abandoned(&self) -> bool {
        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            tracing::debug!(key = %self.key, "load abandoned");
        }
        cancelled
    }

    fn report(&self, progress: f64) {
        if let Some(observer) = &self.options.on_progress {
            observer.notify(progress);
        }
    }
}
