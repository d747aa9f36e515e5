//! Cache-related MCP tools.
//!
//! These inspect and maintain the in-memory sanitized-content cache.

pub mod get;
pub mod list;
pub mod purge;

pub use get::{CacheGetParams, get_impl};
pub use list::{CacheListParams, list_impl};
pub use purge::{CachePurgeParams, purge_impl};
