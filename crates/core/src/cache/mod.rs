//! In-memory cache for sanitized content.
//!
//! This module provides the table the loader memoizes into. It supports:
//!
//! - Exact-match keys over (container, item, scripts flag)
//! - SHA-256 digests as stable public handles for entries
//! - Lazy time-based expiry checked on lookup
//! - Caller-triggered purges (expired or all)

pub mod key;
pub mod table;

pub use crate::Error;

pub use key::{CacheKey, compute_cache_key};
pub use table::{CacheEntry, CacheEntryInfo, ContentCache, now_millis};
