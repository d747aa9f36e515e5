//! cache_list tool implementation.

use cleanpage_core::{ContentCache, Error, cache::{CacheEntryInfo, now_millis}};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Only list entries a load would still be served from.
    #[serde(default)]
    pub fresh_only: bool,

    /// Return at most this many entries, newest first.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheListOutput {
    /// Number of entries in the cache, before filtering.
    pub total: usize,
    pub entries: Vec<CacheEntryInfo>,
}

/// Implementation of the cache_list tool.
pub fn list_impl(cache: &ContentCache, max_age: Duration, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let total = cache.len();
    let entries: Vec<CacheEntryInfo> = cache
        .entries(max_age, now_millis())
        .into_iter()
        .filter(|e| !params.fresh_only || e.fresh)
        .take(params.limit.unwrap_or(usize::MAX))
        .collect();

    let output = CacheListOutput { total, entries };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::output_text;
    use cleanpage_core::CacheKey;

    const MAX_AGE: Duration = Duration::from_secs(30 * 60);

    fn seeded() -> ContentCache {
        let cache = ContentCache::new();
        let now = now_millis();
        cache.insert_at(CacheKey::new("company-pages", "amazon", false), "<p>a</p>".into(), now - 1_000);
        cache.insert_at(CacheKey::new("company-pages", "google", false), "<p>g</p>".into(), now - 2_000);
        cache.insert_at(CacheKey::new("company-pages", "meta", false), "<p>m</p>".into(), now - 60 * 60 * 1000);
        cache
    }

    fn listed(result: &CallToolResult) -> serde_json::Value {
        serde_json::from_str(&output_text(result)).unwrap()
    }

    #[test]
    fn test_list_all_newest_first() {
        let output = listed(&list_impl(&seeded(), MAX_AGE, CacheListParams::default()).unwrap());
        assert_eq!(output["total"], 3);
        let entries = output["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["key"]["item_id"], "amazon");
        assert_eq!(entries[2]["fresh"], false);
    }

    #[test]
    fn test_list_fresh_only() {
        let params = CacheListParams { fresh_only: true, limit: None };
        let output = listed(&list_impl(&seeded(), MAX_AGE, params).unwrap());
        assert_eq!(output["total"], 3);
        assert_eq!(output["entries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_list_limit() {
        let params = CacheListParams { fresh_only: false, limit: Some(1) };
        let output = listed(&list_impl(&seeded(), MAX_AGE, params).unwrap());
        assert_eq!(output["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_list_empty_cache() {
        let output = listed(&list_impl(&ContentCache::new(), MAX_AGE, CacheListParams::default()).unwrap());
        assert_eq!(output["total"], 0);
        assert!(output["entries"].as_array().unwrap().is_empty());
    }
}
