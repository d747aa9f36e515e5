//! file_url tool implementation.
//!
//! Builds view, download, or preview URLs for storage files. No network
//! requests are made.

use cleanpage_client::{AppwriteStorage, FileUrlKind};
use cleanpage_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest preview edge Appwrite renders.
const MAX_PREVIEW_EDGE: u32 = 4000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    #[default]
    View,
    Download,
    Preview,
}

/// Input parameters for file_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileUrlParams {
    /// File id inside the container.
    pub item_id: String,

    /// Container (bucket) id; falls back to the configured default.
    #[serde(default)]
    pub container_id: Option<String>,

    /// "view" (default), "download" or "preview".
    #[serde(default)]
    pub kind: UrlKind,

    /// Preview width in pixels (default: 400).
    #[serde(default)]
    pub width: Option<u32>,

    /// Preview height in pixels (default: 400).
    #[serde(default)]
    pub height: Option<u32>,
}

/// Output structure for file_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileUrlOutput {
    pub url: String,
    pub kind: UrlKind,
}

/// Implementation of the file_url tool.
pub fn file_url_impl(
    storage: &AppwriteStorage, default_container_id: Option<&str>, params: FileUrlParams,
) -> Result<CallToolResult, McpError> {
    let container_id = params
        .container_id
        .as_deref()
        .or(default_container_id)
        .ok_or_else(|| Error::InvalidInput("container_id is required when no default container is configured".into()))?;

    let kind = match params.kind {
        UrlKind::View => FileUrlKind::View,
        UrlKind::Download => FileUrlKind::Download,
        UrlKind::Preview => {
            let kind = FileUrlKind::preview(params.width, params.height);
            if let FileUrlKind::Preview { width, height } = kind
                && !((1..=MAX_PREVIEW_EDGE).contains(&width) && (1..=MAX_PREVIEW_EDGE).contains(&height))
            {
                return Err(
                    Error::InvalidInput(format!("preview size must be between 1 and {MAX_PREVIEW_EDGE} pixels")).into()
                );
            }
            kind
        }
    };

    let url = storage.file_url(container_id, &params.item_id, kind)?;
    let output = FileUrlOutput { url: url.to_string(), kind: params.kind };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
