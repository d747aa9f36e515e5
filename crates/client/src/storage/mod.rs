//! Content location resolution.
//!
//! A resolver turns a (container, item) pair into a dereferenceable URL.
//! It never touches the content itself.

pub mod appwrite;

use async_trait::async_trait;
use cleanpage_core::Error;
use url::Url;

pub use appwrite::{AppwriteStorage, validate_id};

/// Resolves where the raw content of an item lives.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Location of the raw content for `item_id` inside `container_id`.
    ///
    /// Fails with `NOT_CONFIGURED` or `NOT_FOUND` when the pair cannot be
    /// addressed.
    async fn resolve(&self, container_id: &str, item_id: &str) -> Result<Url, Error>;
}

/// Flavour of storage URL to build for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUrlKind {
    /// Inline view of the raw file.
    View,
    /// Download with attachment disposition.
    Download,
    /// Rendered preview image bounded by width and height.
    Preview { width: u32, height: u32 },
}

impl FileUrlKind {
    /// Preview edge used when none is given.
    pub const DEFAULT_PREVIEW_EDGE: u32 = 400;

    /// Preview bounded by the given edges, each defaulting to 400 pixels.
    pub fn preview(width: Option<u32>, height: Option<u32>) -> Self {
        FileUrlKind::Preview {
            width: width.unwrap_or(Self::DEFAULT_PREVIEW_EDGE),
            height: height.unwrap_or(Self::DEFAULT_PREVIEW_EDGE),
        }
    }

    fn segment(&self) -> &'static str {
        match self {
            FileUrlKind::View => "view",
            FileUrlKind::Download => "download",
            FileUrlKind::Preview { .. } => "preview",
        }
    }
}
