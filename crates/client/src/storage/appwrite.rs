//! Appwrite storage URL construction.
//!
//! Files are addressed as
//! `{endpoint}/storage/buckets/{bucket}/files/{file}/{view|download|preview}?project={project}`.
//! Building the URL needs no network access; an unknown file surfaces as
//! a 404 when the fetcher dereferences it.

use super::{FileUrlKind, LocationResolver};
use crate::fetch::{UrlError, canonicalize};
use async_trait::async_trait;
use cleanpage_core::{AppConfig, Error};
use url::Url;

/// Longest identifier Appwrite accepts.
const MAX_ID_LEN: usize = 36;

/// Check an identifier against the Appwrite id rules.
///
/// Allowed: `a-z`, `A-Z`, `0-9`, `.`, `-`, `_`; must not start with a
/// special character; at most 36 characters.
pub fn validate_id(field: &str, id: &str) -> Result<(), Error> {
    if id.is_empty() {
        return Err(Error::NotConfigured(format!("{field} is not set")));
    }
    let valid_chars = id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    let valid_start = id.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    if id.len() > MAX_ID_LEN || !valid_chars || !valid_start {
        return Err(Error::NotFound(format!("invalid {field}: {id:?}")));
    }
    Ok(())
}

/// Resolver for files held in Appwrite storage buckets.
#[derive(Debug, Clone)]
pub struct AppwriteStorage {
    endpoint: Url,
    project_id: String,
}

impl AppwriteStorage {
    /// Create a resolver for the given endpoint and project.
    pub fn new(endpoint: &str, project_id: &str) -> Result<Self, Error> {
        let endpoint = canonicalize(endpoint).map_err(|e| match e {
            UrlError::Empty => Error::NotConfigured("storage endpoint is not set".into()),
            other => Error::InvalidUrl(other.to_string()),
        })?;
        if project_id.trim().is_empty() {
            return Err(Error::NotConfigured("storage project is not set".into()));
        }
        Ok(Self { endpoint, project_id: project_id.trim().to_string() })
    }

    /// Create a resolver from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let endpoint = config
            .require_endpoint()
            .map_err(|e| Error::NotConfigured(e.to_string()))?;
        let project_id = config
            .require_project_id()
            .map_err(|e| Error::NotConfigured(e.to_string()))?;
        Self::new(endpoint, project_id)
    }

    /// Build a view, download, or preview URL for a file.
    pub fn file_url(&self, container_id: &str, item_id: &str, kind: FileUrlKind) -> Result<Url, Error> {
        validate_id("container id", container_id)?;
        validate_id("item id", item_id)?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("endpoint cannot be a base: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(["storage", "buckets", container_id, "files", item_id, kind.segment()]);

        {
            let mut query = url.query_pairs_mut();
            if let FileUrlKind::Preview { width, height } = kind {
                query.append_pair("width", &width.to_string());
                query.append_pair("height", &height.to_string());
            }
            query.append_pair("project", &self.project_id);
        }

        Ok(url)
    }
}

#[async_trait]
impl LocationResolver for AppwriteStorage {
    async fn resolve(&self, container_id: &str, item_id: &str) -> Result<Url, Error> {
        self.file_url(container_id, item_id, FileUrlKind::View)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> AppwriteStorage {
        AppwriteStorage::new("https://cloud.appwrite.io/v1/", "portal").unwrap()
    }

    #[test]
    fn test_view_url() {
        let url = storage().file_url("company-pages", "amazon_sde", FileUrlKind::View).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/storage/buckets/company-pages/files/amazon_sde/view?project=portal"
        );
    }

    #[test]
    fn test_download_url() {
        let url = storage().file_url("notes", "unit1.pdf", FileUrlKind::Download).unwrap();
        assert!(url.path().ends_with("/files/unit1.pdf/download"));
    }

    #[test]
    fn test_preview_url_carries_size() {
        let url = storage().file_url("avatars", "u1", FileUrlKind::preview(None, None)).unwrap();
        assert!(url.path().ends_with("/preview"));
        assert_eq!(url.query(), Some("width=400&height=400&project=portal"));
    }

    #[test]
    fn test_root_endpoint() {
        let storage = AppwriteStorage::new("http://localhost", "p").unwrap();
        let url = storage.file_url("b", "f", FileUrlKind::View).unwrap();
        assert_eq!(url.as_str(), "http://localhost/storage/buckets/b/files/f/view?project=p");
    }

    #[test]
    fn test_missing_configuration() {
        assert!(matches!(AppwriteStorage::new("", "p"), Err(Error::NotConfigured(_))));
        assert!(matches!(AppwriteStorage::new("https://x.io/v1", " "), Err(Error::NotConfigured(_))));
        assert!(matches!(AppwriteStorage::from_config(&AppConfig::default()), Err(Error::NotConfigured(_))));
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            endpoint: Some("cloud.appwrite.io/v1".into()),
            project_id: Some("portal".into()),
            ..Default::default()
        };
        let storage = AppwriteStorage::from_config(&config).unwrap();
        let url = storage.file_url("company-pages", "amazon", FileUrlKind::View).unwrap();
        assert!(url.as_str().starts_with("https://cloud.appwrite.io/v1/storage/"));
    }

    #[test]
    fn test_invalid_endpoint_scheme() {
        assert!(matches!(AppwriteStorage::new("ftp://x.io", "p"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("item id", "amazon_sde-2024.v1").is_ok());
        assert!(matches!(validate_id("item id", ""), Err(Error::NotConfigured(_))));
        assert!(matches!(validate_id("item id", "_hidden"), Err(Error::NotFound(_))));
        assert!(matches!(validate_id("item id", "a/b"), Err(Error::NotFound(_))));
        assert!(matches!(validate_id("item id", &"a".repeat(37)), Err(Error::NotFound(_))));
        assert!(validate_id("item id", &"a".repeat(36)).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_is_view_url() {
        let url = storage().resolve("company-pages", "amazon").await.unwrap();
        assert!(url.path().ends_with("/view"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_container() {
        let err = storage().resolve("../etc", "amazon").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
