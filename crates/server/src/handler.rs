//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheGetParams, CacheListParams, CachePurgeParams, get_impl, list_impl, purge_impl};
use crate::tools::{ContentLoadParams, FileUrlParams, file_url_impl, load_impl};

use cleanpage_client::{AppwriteStorage, SanitizingContentCache};
use cleanpage_core::{AppConfig, ContentCache, Error};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use std::sync::Arc;

const NOT_CONFIGURED_HINT: &str = "storage is not configured; set CLEANPAGE_ENDPOINT and CLEANPAGE_PROJECT_ID";

/// The main MCP server handler for mcp-cleanpage.
#[derive(Clone)]
pub struct CleanpageServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    cache: Arc<ContentCache>,
    loader: Option<Arc<SanitizingContentCache>>,
    storage: Option<AppwriteStorage>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl CleanpageServer {
    /// Create a server handler from loaded configuration.
    ///
    /// Missing storage settings do not prevent startup; the cache tools keep
    /// working and the storage tools report `NOT_CONFIGURED`.
    pub fn new(config: AppConfig) -> Self {
        let cache = Arc::new(ContentCache::new());

        let loader = match SanitizingContentCache::from_config(&config, cache.clone()) {
            Ok(loader) => Some(Arc::new(loader)),
            Err(e) => {
                tracing::warn!(error = %e, "content loading disabled");
                None
            }
        };
        let storage = AppwriteStorage::from_config(&config).ok();

        Self { tool_router: Self::tool_router(), config: Arc::new(config), cache, loader, storage }
    }

    fn loader(&self) -> Result<&SanitizingContentCache, Error> {
        self.loader
            .as_deref()
            .ok_or_else(|| Error::NotConfigured(NOT_CONFIGURED_HINT.into()))
    }

    fn storage(&self) -> Result<&AppwriteStorage, Error> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::NotConfigured(NOT_CONFIGURED_HINT.into()))
    }

    /// Load a stored HTML item as sanitized HTML.
    ///
    /// Fresh cached results are returned without touching storage. The load
    /// is abandoned if the request is cancelled.
    #[tool(
        description = "Load a stored HTML file as sanitized HTML. Scripts and event handlers are removed unless allow_unsafe_scripts is set. Results are cached for 30 minutes by default."
    )]
    async fn content_load(
        &self, params: Parameters<ContentLoadParams>, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        load_impl(self.loader()?, &self.config, params.0, context.ct.child_token()).await
    }

    /// Build a URL for a stored file.
    #[tool(description = "Build a view, download, or preview URL for a stored file. Preview defaults to 400x400.")]
    async fn file_url(&self, params: Parameters<FileUrlParams>) -> Result<CallToolResult, McpError> {
        file_url_impl(self.storage()?, self.config.default_container_id.as_deref(), params.0)
    }

    /// Retrieve a cache entry by hash.
    #[tool(description = "Get cached sanitized HTML by entry hash.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.cache, self.config.max_cache_age(), params.0)
    }

    /// List cache entries.
    #[tool(description = "List cached entries, newest first, with size and freshness.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.cache, self.config.max_cache_age(), params.0)
    }

    /// Purge cache entries.
    #[tool(description = "Remove expired cache entries (default), one entry by hash, or all entries.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, self.config.max_cache_age(), params.0)
    }
}

impl ServerHandler for CleanpageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-cleanpage".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
