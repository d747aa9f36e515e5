//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-cleanpage server.

pub mod cache;
pub mod content_load;
pub mod file_url;

pub use content_load::{ContentLoadOutput, ContentLoadParams, load_impl};
pub use file_url::{FileUrlOutput, FileUrlParams, file_url_impl};
