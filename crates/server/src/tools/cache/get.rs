//! cache_get tool implementation.
//!
//! Retrieves cached sanitized content by entry hash.

use cleanpage_core::{ContentCache, Error, cache::now_millis};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Hash of the cache entry, as reported by content_load or cache_list.
    pub hash: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub container_id: String,
    pub item_id: String,
    pub allow_unsafe_scripts: bool,
    /// RFC 3339 timestamp of when the entry was written.
    pub cached_at: String,
    /// Whether a load would still be served from this entry.
    pub fresh: bool,
    pub html: String,
}

/// Implementation of the cache_get tool.
pub fn get_impl(cache: &ContentCache, max_age: Duration, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let (key, entry) = cache
        .find_by_hash(&params.hash)
        .ok_or_else(|| Error::CacheMiss(params.hash.clone()))?;

    let output = CacheGetOutput {
        fresh: entry.is_fresh(max_age, now_millis()),
        cached_at: entry.cached_at().to_rfc3339(),
        container_id: key.container_id,
        item_id: key.item_id,
        allow_unsafe_scripts: key.allow_unsafe_scripts,
        html: entry.sanitized_content,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize entry: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::output_text;
    use cleanpage_core::CacheKey;

    const MAX_AGE: Duration = Duration::from_secs(30 * 60);

    #[test]
    fn test_get_impl_missing() {
        let cache = ContentCache::new();
        let err = get_impl(&cache, MAX_AGE, CacheGetParams { hash: "nonexistent".into() }).unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[test]
    fn test_get_impl_found() {
        let cache = ContentCache::new();
        let key = CacheKey::new("company-pages", "amazon", true);
        cache.insert(key.clone(), "<p>cached</p>".into());

        let result = get_impl(&cache, MAX_AGE, CacheGetParams { hash: key.digest() }).unwrap();
        let output: CacheGetOutput = serde_json::from_str(&output_text(&result)).unwrap();
        assert_eq!(output.item_id, "amazon");
        assert!(output.allow_unsafe_scripts);
        assert!(output.fresh);
        assert_eq!(output.html, "<p>cached</p>");
    }

    #[test]
    fn test_get_impl_reports_stale() {
        let cache = ContentCache::new();
        let key = CacheKey::new("company-pages", "amazon", false);
        cache.insert_at(key.clone(), "<p>old</p>".into(), now_millis() - 60 * 60 * 1000);

        let result = get_impl(&cache, MAX_AGE, CacheGetParams { hash: key.digest() }).unwrap();
        let output: CacheGetOutput = serde_json::from_str(&output_text(&result)).unwrap();
        assert!(!output.fresh);
    }
}
