use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::storage::object_store::ObjectStore;

/// In-process object store keeping blobs in a map.
///
/// Stands in for S3 in tests and local runs; mirrors its contract, including
/// `get` on a missing key being an error rather than `None`.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, ServiceError> {
        let map = self.inner.read().await;
        map.get(key)
            .cloned()
            .ok_or_else(|| ServiceError::Store(format!("get {key} failed: no such key")))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), body);
        Ok(())
    }
}
