//! content_load tool implementation.
//!
//! Runs a load to completion through the shared sanitizing cache and
//! returns the terminal state.

use cleanpage_client::{LoadOptions, SanitizingContentCache};
use cleanpage_core::{AppConfig, Error, cache::compute_cache_key};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Input parameters for content_load tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentLoadParams {
    /// Item (file) id inside the container.
    pub item_id: String,

    /// Container (bucket) id; falls back to the configured default.
    #[serde(default)]
    pub container_id: Option<String>,

    /// Keep `<script>` elements in the output.
    #[serde(default)]
    pub allow_unsafe_scripts: bool,

    /// Sanitize in chunks; overrides the configured default.
    #[serde(default)]
    pub progressive: Option<bool>,

    /// Refetch cached content at least this old; overrides the configured default.
    #[serde(default)]
    pub max_cache_age_ms: Option<u64>,
}

/// Output structure for content_load tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentLoadOutput {
    pub container_id: String,
    pub item_id: String,
    pub allow_unsafe_scripts: bool,
    /// Cache entry hash, usable with cache_purge.
    pub hash: String,
    /// Sanitized HTML; empty on error.
    pub html: String,
    pub error: Option<String>,
    pub progress: f64,
    /// Raw size in bytes; 0 when served from cache.
    pub total_bytes: usize,
}

/// Implementation of the content_load tool.
pub async fn load_impl(
    loader: &SanitizingContentCache, config: &AppConfig, params: ContentLoadParams, cancel: CancellationToken,
) -> Result<CallToolResult, McpError> {
    if params.item_id.trim().is_empty() {
        return Err(Error::InvalidInput("item_id cannot be empty".into()).into());
    }

    let container_id = params
        .container_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| loader.default_container_id().map(str::to_string))
        .ok_or_else(|| Error::InvalidInput("container_id is required when no default container is configured".into()))?;

    let mut options = LoadOptions::from_config(config)
        .container(container_id.clone())
        .allow_unsafe_scripts(params.allow_unsafe_scripts);
    if let Some(progressive) = params.progressive {
        options = options.progressive(progressive);
    }
    if let Some(ms) = params.max_cache_age_ms {
        options = options.max_cache_age(Duration::from_millis(ms));
    }

    let state = loader
        .load_to_completion(Some(&params.item_id), options, cancel.clone())
        .await;
    if cancel.is_cancelled() {
        return Err(McpError::new(ErrorCode::INTERNAL_ERROR, "request cancelled", None));
    }

    let failed = state.is_error();
    let output = ContentLoadOutput {
        hash: compute_cache_key(&container_id, &params.item_id, params.allow_unsafe_scripts),
        container_id,
        item_id: params.item_id,
        allow_unsafe_scripts: params.allow_unsafe_scripts,
        html: state.html,
        error: state.error,
        progress: state.progress,
        total_bytes: state.total_bytes,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    if failed {
        return Ok(CallToolResult::error(vec![Content::text(json)]));
    }
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
