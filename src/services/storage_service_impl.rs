use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{
        services::StorageService,
        storage::{ClientError, ObjectContent, ObjectStoreClient, UploadStream},
    },
};

/// Presign expiry used when the caller passes a zero duration.
const DEFAULT_URL_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Primitive storage operations over a single long-lived client handle.
#[derive(Clone)]
pub struct StorageServiceImpl {
    client: Arc<dyn ObjectStoreClient>,
}

impl StorageServiceImpl {
    pub fn new(client: Arc<dyn ObjectStoreClient>) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &Arc<dyn ObjectStoreClient> {
        &self.client
    }

    /// Create the bucket if it is not there yet. Invoked from write paths
    /// only; read paths never provision buckets. A concurrent writer may
    /// create the bucket between the check and the create, so a
    /// "bucket already exists" failure counts as success.
    pub(crate) async fn ensure_bucket_exists(&self, bucket: &BucketName) -> StorageResult<()> {
        if self.bucket_exists(bucket).await {
            return Ok(());
        }

        match self.client.create_bucket(bucket).await {
            Ok(()) => {
                info!(bucket = %bucket, "created missing bucket");
                Ok(())
            }
            Err(ClientError::BucketAlreadyExists { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl StorageService for StorageServiceImpl {
    async fn bucket_exists(&self, bucket: &BucketName) -> bool {
        match self.client.bucket_exists(bucket).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "bucket existence check failed, reporting absent");
                false
            }
        }
    }

    async fn file_exists(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<bool> {
        match self.client.stat_object(bucket, key).await {
            Ok(_) => Ok(true),
            Err(ClientError::NoSuchKey { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> StorageResult<ObjectKey> {
        self.ensure_bucket_exists(bucket).await?;

        debug!(bucket = %bucket, key = %key, size = content.len(), "uploading object");
        self.client.put_object(bucket, key, content).await?;
        Ok(key.clone())
    }

    async fn upload_file_stream(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        mut content: UploadStream,
    ) -> StorageResult<ObjectKey> {
        // The stream carries no trustworthy length hint, so read it fully
        // and upload with the exact byte count.
        let mut buf = BytesMut::new();
        while let Some(chunk) = content.next().await {
            let chunk = chunk.map_err(|e| {
                StorageError::operation_with_source(
                    format!("Failed to read upload stream: {}", e),
                    e,
                )
            })?;
            buf.extend_from_slice(&chunk);
        }

        self.upload_file(bucket, key, buf.freeze()).await
    }

    async fn download_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectContent> {
        debug!(bucket = %bucket, key = %key, "downloading object");
        Ok(self.client.get_object(bucket, key, None).await?)
    }

    async fn download_chunked_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        offset: u64,
        length: u64,
    ) -> StorageResult<ObjectContent> {
        debug!(bucket = %bucket, key = %key, offset, length, "downloading object range");
        Ok(self
            .client
            .get_object(bucket, key, Some((offset, length)))
            .await?)
    }

    async fn get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiration: Duration,
    ) -> StorageResult<String> {
        let expiry = if expiration.is_zero() {
            DEFAULT_URL_EXPIRY
        } else {
            expiration
        };
        Ok(self.client.presigned_get_url(bucket, key, expiry).await?)
    }

    async fn delete_file(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()> {
        debug!(bucket = %bucket, key = %key, "deleting object");
        Ok(self.client.remove_object(bucket, key).await?)
    }
}
