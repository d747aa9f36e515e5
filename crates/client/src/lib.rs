//! Client code for cleanpage.
//!
//! This crate resolves storage items to URLs, fetches their raw HTML,
//! sanitizes it, and serves the result through a time-bounded cache with
//! optional progressive (chunked) delivery.

pub mod fetch;
pub mod loader;
pub mod sanitize;
pub mod storage;

pub use fetch::{ContentFetcher, FetchConfig, HttpFetcher};
pub use loader::{LoadOptions, LoadState, ProgressObserver, SanitizingContentCache};
pub use sanitize::{AmmoniaSanitizer, Sanitizer};
pub use storage::{AppwriteStorage, FileUrlKind, LocationResolver};

use cleanpage_core::{AppConfig, ContentCache, Error};
use std::sync::Arc;

impl SanitizingContentCache {
    /// Wire the Appwrite resolver, HTTP fetcher, and ammonia sanitizer from
    /// configuration.
    pub fn from_config(config: &AppConfig, cache: Arc<ContentCache>) -> Result<Self, Error> {
        let storage = AppwriteStorage::from_config(config)?;
        let fetcher = HttpFetcher::new(FetchConfig::from(config))?;

        let loader = Self::new(cache, Arc::new(storage), Arc::new(fetcher));
        Ok(match &config.default_container_id {
            Some(container_id) => loader.with_default_container(container_id.clone()),
            None => loader,
        })
    }
}
