//! Temporary access URLs for asset content.
//!
//! [`AssetUrlStore`] plays the role of a browser's object-URL registry: a
//! viewer asks an [`Asset`](crate::models::Asset) for a URL, hands that URL
//! to whatever displays the file, and later resolves it back to bytes. URLs
//! live until revoked, so the consumer must revoke them once the asset is no
//! longer shown.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::error::AiaError;

/// Scheme and authority prefixed to every issued URL.
pub const URL_PREFIX: &str = "blob:aia-kit/";

/// Registry of live asset URLs. Safe to share between threads.
///
/// Every store has its own identity; a URL is only meaningful to the store
/// that issued it.
pub struct AssetUrlStore {
    id: Uuid,
    blobs: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl Default for AssetUrlStore {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            blobs: RwLock::new(HashMap::new()),
        }
    }
}

impl AssetUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of this store, distinct for every instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Registers `content` under a fresh URL and returns the URL.
    pub fn register(&self, content: Arc<[u8]>) -> Result<String, AiaError> {
        let url = format!("{URL_PREFIX}{}", Uuid::new_v4());
        self.blobs
            .write()
            .map_err(|e| AiaError::AssetUrl(format!("asset url store poisoned: {e}")))?
            .insert(url.clone(), content);
        tracing::debug!(%url, "asset url registered");
        Ok(url)
    }

    /// Returns the content behind `url`, or `None` if it was never issued or
    /// has been revoked.
    pub fn resolve(&self, url: &str) -> Result<Option<Arc<[u8]>>, AiaError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| AiaError::AssetUrl(format!("asset url store poisoned: {e}")))?;
        Ok(blobs.get(url).cloned())
    }

    /// Drops the registration for `url`. Returns `true` if it was live.
    pub fn revoke(&self, url: &str) -> Result<bool, AiaError> {
        let removed = self
            .blobs
            .write()
            .map_err(|e| AiaError::AssetUrl(format!("asset url store poisoned: {e}")))?
            .remove(url)
            .is_some();
        if removed {
            tracing::debug!(%url, "asset url revoked");
        }
        Ok(removed)
    }

    /// Number of live URLs.
    pub fn len(&self) -> Result<usize, AiaError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| AiaError::AssetUrl(format!("asset url store poisoned: {e}")))?;
        Ok(blobs.len())
    }

    pub fn is_empty(&self) -> Result<bool, AiaError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_is_empty() {
        let store = AssetUrlStore::default();
        assert!(store.is_empty().expect("is_empty"));
    }

    #[test]
    fn register_issues_unique_prefixed_urls() {
        let store = AssetUrlStore::new();
        let content: Arc<[u8]> = Arc::from(&b"abc"[..]);
        let a = store.register(Arc::clone(&content)).expect("register");
        let b = store.register(content).expect("register");
        assert!(a.starts_with(URL_PREFIX));
        assert_ne!(a, b);
        assert_eq!(store.len().expect("len"), 2);
    }

    #[test]
    fn stores_have_distinct_ids() {
        assert_ne!(AssetUrlStore::new().id(), AssetUrlStore::new().id());
    }

    #[test]
    fn url_from_another_store_does_not_resolve() {
        let a = AssetUrlStore::new();
        let b = AssetUrlStore::new();
        let url = a.register(Arc::from(&b"x"[..])).expect("register");
        assert!(b.resolve(&url).expect("resolve").is_none());
        assert!(!b.revoke(&url).expect("revoke"));
        assert!(a.resolve(&url).expect("resolve").is_some());
    }

    #[test]
    fn resolve_unknown_url_is_none() {
        let store = AssetUrlStore::new();
        assert!(store
            .resolve("blob:aia-kit/unknown")
            .expect("resolve")
            .is_none());
    }

    #[test]
    fn revoke_removes_registration() {
        let store = AssetUrlStore::new();
        let url = store.register(Arc::from(&b"x"[..])).expect("register");
        assert!(store.revoke(&url).expect("revoke"));
        assert!(!store.revoke(&url).expect("revoke twice"));
        assert!(store.is_empty().expect("is_empty"));
    }
}
