use async_trait::async_trait;

use crate::errors::ServiceError;

/// Trait abstraction for a flat key/blob object store.
/// Implementations can be S3-backed or in-memory.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lightweight metadata probe: does the object exist?
    async fn exists(&self, key: &str) -> Result<bool, ServiceError>;

    /// Fetch the full object body. Calling this for a missing key is a
    /// `Store` error; probe with `exists` first.
    async fn get(&self, key: &str) -> Result<Vec<u8>, ServiceError>;

    /// Write the full object body, unconditionally overwriting prior content.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), ServiceError>;
}
