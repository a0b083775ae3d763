use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    domain::{
        errors::StorageResult,
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::{ObjectContent, UploadStream},
};

/// Primitive storage contract: upload, download, existence checks and
/// presigned-URL issuance against a single backing store.
///
/// Stateless besides the held client handle; safe for concurrent use to the
/// extent the underlying client is. All failures reach the caller as the
/// unified [`crate::domain::StorageError`], with two deliberate exceptions
/// documented on the methods below.
#[async_trait]
pub trait StorageService: Send + Sync + 'static {
    /// Whether the bucket exists. Any failure of the check itself, network
    /// included, is swallowed and reported as `false`; callers cannot
    /// distinguish "absent" from "check failed" at this layer.
    async fn bucket_exists(&self, bucket: &BucketName) -> bool;

    /// Whether the object exists. A store-reported not-found becomes
    /// `false`; every other failure propagates as an error. Intentionally
    /// asymmetric with [`StorageService::bucket_exists`].
    async fn file_exists(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<bool>;

    /// Write `content` under `key`, creating the bucket first if absent.
    /// Returns the key on success.
    async fn upload_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> StorageResult<ObjectKey>;

    /// Streamed variant of [`StorageService::upload_file`]. The stream
    /// length may be unknown in advance; the content is read fully to
    /// determine the exact length before the store call.
    async fn upload_file_stream(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: UploadStream,
    ) -> StorageResult<ObjectKey>;

    /// Full object content as a lazily-read stream owned by the caller.
    async fn download_file(&self, bucket: &BucketName, key: &ObjectKey)
        -> StorageResult<ObjectContent>;

    /// Like [`StorageService::download_file`] but only `[offset,
    /// offset + length)`. Offsets are not validated locally; out-of-range
    /// requests surface as store-reported errors.
    async fn download_chunked_file(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        offset: u64,
        length: u64,
    ) -> StorageResult<ObjectContent>;

    /// GET-only presigned URL valid for `expiration`. A zero duration means
    /// "use the store default", not "already expired".
    async fn get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiration: Duration,
    ) -> StorageResult<String>;

    /// Remove exactly one object. Whether deleting a missing object errors
    /// is store-dependent and not normalized here.
    async fn delete_file(&self, bucket: &BucketName, key: &ObjectKey) -> StorageResult<()>;
}

/// Policy layer on top of [`StorageService`]: paginated listing, bulk folder
/// deletion and day-granularity presigned URLs.
#[async_trait]
pub trait ManagedStorageService: StorageService {
    /// One page of the bucket's recursive listing, in store order.
    ///
    /// Fails with an invalid-argument error ("Page must be >= 0" /
    /// "Page size must be >= 1") before any network call when the window
    /// parameters are out of range. A window past the end of the listing
    /// yields an empty vec, not an error.
    async fn list_objects_by_page(
        &self,
        bucket: &BucketName,
        page: i64,
        page_size: i64,
    ) -> StorageResult<Vec<String>>;

    /// Presigned GET URL expressed in whole days. Zero days means the store
    /// default expiry.
    async fn get_document_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiration_in_days: i64,
    ) -> StorageResult<String>;

    /// Delete every object under `prefix` (normalized to end with `/`).
    ///
    /// Zero matches issue zero delete calls; otherwise a single bulk call
    /// is made. The first per-key failure fails the whole operation with an
    /// error naming the key; already-applied deletions are not rolled back,
    /// so this operation is not atomic.
    async fn delete_folder(&self, bucket: &BucketName, prefix: &str) -> StorageResult<()>;
}
