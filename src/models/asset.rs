//! Binary assets bundled under `assets/` in the archive.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use sha2::Digest as _;
use uuid::Uuid;

use crate::assets::AssetUrlStore;
use crate::error::AiaError;

/// One file from the archive's top-level `assets/` directory.
///
/// The content is owned by the asset. A temporary access URL is created on
/// the first call to [`Asset::url`] for a given [`AssetUrlStore`] and stays
/// valid until [`Asset::revoke_url`] is called with that same store; nothing
/// revokes it automatically. Each store gets its own URL.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// File name including extension, e.g. `"icon.png"`.
    pub name: String,
    /// File extension without the dot, e.g. `"png"`.
    #[serde(rename = "type")]
    pub file_type: String,
    /// Size of the content in bytes.
    pub size: u64,
    #[serde(skip)]
    content: Arc<[u8]>,
    /// Issued URLs keyed by [`AssetUrlStore::id`].
    #[serde(skip)]
    urls: Mutex<HashMap<Uuid, String>>,
}

impl Asset {
    pub fn new(name: impl Into<String>, file_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_type: file_type.into(),
            size: content.len() as u64,
            content: content.into(),
            urls: Mutex::new(HashMap::new()),
        }
    }

    /// Raw file content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// SHA-256 hex digest of the content.
    pub fn checksum(&self) -> String {
        format!("{:x}", sha2::Sha256::digest(&self.content))
    }

    /// Returns this asset's temporary URL in `store`, registering it on
    /// first use. Later calls with the same store return the same URL until
    /// it is revoked.
    pub fn url(&self, store: &AssetUrlStore) -> Result<String, AiaError> {
        let mut urls = self
            .urls
            .lock()
            .map_err(|e| AiaError::AssetUrl(format!("asset url lock poisoned: {e}")))?;
        if let Some(url) = urls.get(&store.id()) {
            return Ok(url.clone());
        }
        let url = store.register(Arc::clone(&self.content))?;
        urls.insert(store.id(), url.clone());
        Ok(url)
    }

    /// Revokes the URL handed out by [`Asset::url`] for `store`, if any.
    /// URLs issued by other stores stay live.
    ///
    /// Returns `true` when a URL was outstanding.
    pub fn revoke_url(&self, store: &AssetUrlStore) -> Result<bool, AiaError> {
        let mut urls = self
            .urls
            .lock()
            .map_err(|e| AiaError::AssetUrl(format!("asset url lock poisoned: {e}")))?;
        match urls.remove(&store.id()) {
            Some(url) => {
                store.revoke(&url)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("name", &self.name)
            .field("file_type", &self.file_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
