use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::{BucketName, ObjectKey},
    },
    ports::{
        services::{ManagedStorageService, StorageService},
        storage::{DeletionOutcome, ObjectContent, ObjectStoreClient, UploadStream},
    },
    services::StorageServiceImpl,
};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Policy layer over [`StorageServiceImpl`]: pagination over the store's
/// unordered-but-stable listing, bulk folder deletion with per-key failure
/// inspection, and day-granularity presigned URLs.
#[derive(Clone)]
pub struct ManagedStorageServiceImpl {
    service: StorageServiceImpl,
}

impl ManagedStorageServiceImpl {
    pub fn new(client: Arc<dyn ObjectStoreClient>) -> Self {
        Self {
            service: StorageServiceImpl::new(client),
        }
    }

    fn client(&self) -> &Arc<dyn ObjectStoreClient> {
        self.service.client()
    }
}

#[async_trait]
impl StorageService for ManagedStorageServiceImpl {
    async fn bucket_exists(&self, bucket: &BucketName) -> bool {
        self.service.bucket_exists(bucket).await
    }

    async fn file_exists(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<bool> {
        self.service.file_exists(bucket, key).await
    }

    async fn upload_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> StorageResult<ObjectKey> {
        self.service.upload_file(bucket, key, content).await
    }

    async fn upload_file_stream(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: UploadStream,
    ) -> StorageResult<ObjectKey> {
        self.service.upload_file_stream(bucket, key, content).await
    }

    async fn download_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
    ) -> StorageResult<ObjectContent> {
        self.service.download_file(bucket, key).await
    }

    async fn download_chunked_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        offset: u64,
        length: u64,
    ) -> StorageResult<ObjectContent> {
        self.service
            .download_chunked_file(bucket, key, offset, length)
            .await
    }

    async fn get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiration: Duration,
    ) -> StorageResult<String> {
        self.service.get_url(bucket, key, expiration).await
    }

    async fn delete_file(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()> {
        self.service.delete_file(bucket, key).await
    }
}

#[async_trait]
impl ManagedStorageService for ManagedStorageServiceImpl {
    async fn list_objects_by_page(
        &self,
        bucket: &BucketName,
        page: i64,
        page_size: i64,
    ) -> StorageResult<Vec<String>> {
        // Window parameters are checked before any network call.
        if page < 0 {
            return Err(StorageError::invalid_argument("Page must be >= 0"));
        }
        if page_size < 1 {
            return Err(StorageError::invalid_argument("Page size must be >= 1"));
        }

        // Re-lists the whole bucket per page and windows in store order.
        // Fine for small buckets; a store-native continuation cursor would
        // be the efficient alternative for huge ones.
        let listing = self.client().list_objects(bucket, None, true).await?;

        let skip = (page as usize).saturating_mul(page_size as usize);
        let keys = listing
            .into_iter()
            .map(|info| info.key)
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Ok(keys)
    }

    async fn get_document_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiration_in_days: i64,
    ) -> StorageResult<String> {
        if expiration_in_days < 0 {
            return Err(StorageError::invalid_argument(
                "Expiration must be >= 0 days",
            ));
        }

        let expiration = Duration::from_secs(expiration_in_days as u64 * SECONDS_PER_DAY);
        self.get_url(bucket, key, expiration).await
    }

    async fn delete_folder(&self, bucket: &BucketName, prefix: &str) -> StorageResult<()> {
        // Normalize to a trailing separator so "folder" never matches
        // "folder2/x".
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        let listing = self
            .client()
            .list_objects(bucket, Some(&prefix), true)
            .await?;

        let keys: Vec<String> = listing.into_iter().map(|info| info.key).collect();
        if keys.is_empty() {
            debug!(bucket = %bucket, prefix = %prefix, "no objects under prefix, nothing to delete");
            return Ok(());
        }

        debug!(bucket = %bucket, prefix = %prefix, count = keys.len(), "bulk deleting objects");
        let outcomes = self.client().remove_objects(bucket, keys).await?;

        // Stop at the first reported per-key failure. Deletions the store
        // already applied stay applied; this operation is not atomic.
        for outcome in outcomes {
            if let DeletionOutcome::Failed { key, reason } = outcome {
                return Err(StorageError::operation(format!(
                    "Error deleting object {} : {}",
                    key, reason
                )));
            }
        }

        Ok(())
    }
}
