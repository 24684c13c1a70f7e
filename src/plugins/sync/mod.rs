//! Persistence adapter: optimistic local writes, best-effort remote sync,
//! local fallback when the remote is unreachable.

pub mod keys;
pub mod local;
pub mod records;
pub mod remote;

use crate::core::settings::AppSettings;
use crate::shared::paths::get_cache_dir;
use local::LocalCache;
use records::{ListRecord, Loaded};
use remote::{RemoteStore, SyncError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub struct SyncStore {
    local: LocalCache,
    remote: RemoteStore,
}

impl SyncStore {
    pub fn new(local: LocalCache, remote: RemoteStore) -> Self {
        Self { local, remote }
    }

    /// Remote at `api_url`, local copy in the storage cache dir.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SyncError> {
        let remote = RemoteStore::new(&settings.api_url, settings.request_timeout())?;
        Ok(Self::new(LocalCache::new(get_cache_dir()), remote))
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    /// Remote first. A remote answer is authoritative (a non-null one also
    /// refreshes the local copy); any remote failure falls back to local.
    pub async fn get(&self, key: &str) -> Option<Value> {
        match self.remote.get(key).await {
            Ok(Value::Null) => None,
            Ok(value) => {
                if let Err(e) = self.local.put(key, &value) {
                    tracing::warn!(target: "sync", key, error = %e, "Failed to refresh local copy");
                }
                Some(value)
            }
            Err(e) => {
                tracing::warn!(target: "sync", key, error = %e, "Remote read failed, using local copy");
                self.local.get(key)
            }
        }
    }

    /// Local write first, then remote. Neither failure is returned and the
    /// local copy is never rolled back.
    pub async fn save(&self, key: &str, value: Value) {
        if let Err(e) = self.local.put(key, &value) {
            tracing::warn!(target: "sync", key, error = %e, "Local write failed");
        }

        match self.remote.put(key, &value).await {
            Ok(()) => tracing::debug!(target: "sync", key, "Synced"),
            Err(e) => tracing::warn!(target: "sync", key, error = %e, "Remote write failed, kept locally"),
        }
    }

    /// Remote only. The local copy is left as is.
    pub async fn delete(&self, key: &str) {
        match self.remote.delete(key).await {
            Ok(()) => tracing::debug!(target: "sync", key, "Dropped remote key"),
            Err(e) => tracing::warn!(target: "sync", key, error = %e, "Remote delete failed"),
        }
    }

    /// Typed read through the versioned record envelope.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        records::decode(key, value)
    }

    /// Typed read of a list key, entry by entry.
    pub async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Loaded<ListRecord<T>> {
        match self.get(key).await {
            Some(value) => records::decode_list(key, value),
            None => Loaded::Absent,
        }
    }

    /// Writes `items` and then the raw entries a previous read could not decode.
    pub async fn store_list<T: Serialize>(&self, key: &str, items: &[T], rejected: &[Value]) {
        match records::encode_list(items, rejected) {
            Ok(value) => self.save(key, value).await,
            Err(e) => tracing::error!(target: "sync", key, error = %e, "Failed to encode record"),
        }
    }

    pub async fn store<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        match records::encode(data) {
            Ok(value) => self.save(key, value).await,
            Err(e) => tracing::error!(target: "sync", key, error = %e, "Failed to encode record"),
        }
    }
}
