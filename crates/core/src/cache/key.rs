//! Cache key identity and its stable digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity of one sanitized result.
///
/// Matching is exact on all three fields; equivalent containers are not
/// normalized onto each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheKey {
    pub container_id: String,
    pub item_id: String,
    pub allow_unsafe_scripts: bool,
}

impl CacheKey {
    pub fn new(container_id: impl Into<String>, item_id: impl Into<String>, allow_unsafe_scripts: bool) -> Self {
        Self { container_id: container_id.into(), item_id: item_id.into(), allow_unsafe_scripts }
    }

    /// Hex SHA-256 over the key fields, used as the public handle of an entry.
    pub fn digest(&self) -> String {
        compute_cache_key(&self.container_id, &self.item_id, self.allow_unsafe_scripts)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container_id, self.item_id)?;
        if self.allow_unsafe_scripts {
            write!(f, " (scripts allowed)")?;
        }
        Ok(())
    }
}

/// Compute the digest for a (container, item, scripts) triple.
pub fn compute_cache_key(container_id: &str, item_id: &str, allow_unsafe_scripts: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(container_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(item_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(if allow_unsafe_scripts { b"unsafe".as_slice() } else { b"safe".as_slice() });
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("pages", "amazon", false);
        let hash2 = compute_cache_key("pages", "amazon", false);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_script_flag() {
        let safe = compute_cache_key("pages", "amazon", false);
        let unsafe_ = compute_cache_key("pages", "amazon", true);
        assert_ne!(safe, unsafe_);
    }

    #[test]
    fn test_hash_field_boundaries() {
        // "ab" + "c" must not collide with "a" + "bc"
        assert_ne!(compute_cache_key("ab", "c", false), compute_cache_key("a", "bc", false));
    }

    #[test]
    fn test_hash_format() {
        let hash = CacheKey::new("pages", "amazon", false).digest();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_equality_is_exact() {
        let a = CacheKey::new("pages", "amazon", false);
        assert_eq!(a, CacheKey::new("pages", "amazon", false));
        assert_ne!(a, CacheKey::new("Pages", "amazon", false));
        assert_ne!(a, CacheKey::new("pages", "amazon", true));
    }

    #[test]
    fn test_display() {
        assert_eq!(CacheKey::new("pages", "amazon", false).to_string(), "pages/amazon");
        assert_eq!(CacheKey::new("pages", "amazon", true).to_string(), "pages/amazon (scripts allowed)");
    }
}
