//! cache_purge tool implementation.
//!
//! Removes expired entries (the default), one entry by hash, or everything.

use cleanpage_core::{ContentCache, Error, cache::now_millis};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Remove every entry, fresh or not.
    #[serde(default)]
    pub all: bool,

    /// Remove only the entry with this hash.
    #[serde(default)]
    pub hash: Option<String>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries removed.
    pub removed: u64,
    /// Entries left after the purge.
    pub remaining: usize,
}

/// Implementation of the cache_purge tool.
pub fn purge_impl(
    cache: &ContentCache, max_age: Duration, params: CachePurgeParams,
) -> Result<CallToolResult, McpError> {
    let removed = match (params.all, params.hash) {
        (true, Some(_)) => {
            return Err(Error::InvalidInput("all and hash cannot be combined".to_string()).into());
        }
        (true, None) => cache.clear(),
        (false, Some(hash)) => {
            let (key, _) = cache
                .find_by_hash(&hash)
                .ok_or_else(|| Error::CacheMiss(hash.clone()))?;
            u64::from(cache.remove(&key))
        }
        (false, None) => cache.purge_expired(max_age, now_millis()),
    };
    tracing::debug!(removed, "cache purged");

    let output = CachePurgeOutput { removed, remaining: cache.len() };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
