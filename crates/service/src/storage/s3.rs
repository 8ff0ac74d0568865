use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::errors::ServiceError;
use crate::storage::object_store::ObjectStore;

/// S3-backed object store bound to a single bucket.
///
/// The bucket identity is process-lifetime configuration injected at
/// construction, never a global. No retries or timeouts are layered on here;
/// a failed call fails the operation.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    /// Build a client from the ambient AWS environment (credentials, region).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let cfg = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&cfg), bucket)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) => {
                debug!(%key, "object absent");
                Ok(false)
            }
            Err(e) => Err(ServiceError::Store(format!(
                "head {key} failed: {}",
                DisplayErrorContext(&e)
            ))),
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, ServiceError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                ServiceError::Store(format!("get {key} failed: {}", DisplayErrorContext(&e)))
            })?;
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| ServiceError::Store(format!("read {key} body failed: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), ServiceError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                ServiceError::Store(format!("put {key} failed: {}", DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}
