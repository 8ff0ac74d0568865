use std::sync::Arc;

use models::message::Message;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::ObjectStore;

/// Suffix appended to every sanitized collection name to form the object key.
const KEY_SUFFIX: &str = ".json";
/// Collection name substituted when the caller supplies a blank one.
const DEFAULT_COLLECTION: &str = "messages";

/// Durable read/write of a named ordered sequence of messages, persisted as
/// one JSON-array object per collection.
///
/// "Object absent" is normalized to an empty collection here, so callers see
/// no difference between "never created" and "created then emptied".
///
/// Concurrency hazard: `load` followed by `save` is a read-modify-write
/// sequence with no locking, versioning, or conditional put. Two concurrent
/// appenders can both read the same prior state and the later `save` silently
/// discards the earlier writer's addition. Callers needing exclusion must
/// provide it outside this store.
#[derive(Clone)]
pub struct CollectionStore {
    store: Arc<dyn ObjectStore>,
}

impl CollectionStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Derive the backing object key for a logical collection name:
    /// trim whitespace, substitute the default name when blank, append the
    /// fixed suffix. Callers never see or hold the key directly.
    pub fn storage_key(name: &str) -> String {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_COLLECTION } else { name };
        format!("{name}{KEY_SUFFIX}")
    }

    /// Load the full collection. A missing backing object is a success and
    /// yields an empty sequence; a present object that fails to decode as a
    /// JSON array of messages is a data-integrity failure.
    pub async fn load(&self, name: &str) -> Result<Vec<Message>, ServiceError> {
        let key = Self::storage_key(name);
        if !self.store.exists(&key).await? {
            return Ok(Vec::new());
        }
        let bytes = self.store.get(&key).await?;
        let messages: Vec<Message> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::DataIntegrity(format!("decode {key} failed: {e}")))?;
        debug!(%key, count = messages.len(), "collection loaded");
        Ok(messages)
    }

    /// Serialize the collection as an indented JSON array and overwrite the
    /// backing object in full. No partial writes, no merge.
    pub async fn save(&self, name: &str, messages: &[Message]) -> Result<(), ServiceError> {
        let key = Self::storage_key(name);
        let data = serde_json::to_vec_pretty(messages)
            .map_err(|e| ServiceError::DataIntegrity(format!("encode {key} failed: {e}")))?;
        self.store.put(&key, data).await?;
        debug!(%key, count = messages.len(), "collection saved");
        Ok(())
    }
}
