use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use thiserror::Error as ThisError;

use crate::domain::{
    errors::{StorageError, StorageResult},
    value_objects::{BucketName, ObjectKey},
};

/// Errors reported by an [`ObjectStoreClient`] implementation.
///
/// This is the wire-level taxonomy; the service layer translates everything
/// into the unified [`StorageError`] except the conditions it normalizes to
/// booleans, which it detects through the structured variants here.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("No such bucket: {bucket}")]
    NoSuchBucket { bucket: String },

    #[error("No such key: {key}")]
    NoSuchKey { key: String },

    #[error("Bucket already exists: {bucket}")]
    BucketAlreadyExists { bucket: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {status} - {message}")]
    Http {
        status: http::StatusCode,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type for client capability operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StorageError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        StorageError::Operation {
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// One entry of a bucket listing as yielded by the store.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub etag: Option<String>,
}

/// Per-key result of a bulk delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted { key: String },
    Failed { key: String, reason: String },
}

/// Byte stream fed into a streamed upload. Length may be unknown in advance;
/// implementations must not rely on any buffered-bytes hint.
pub type UploadStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Lazily-read object content returned by download operations.
///
/// The caller owns the stream and must drive it to completion (or drop it)
/// on every exit path; the underlying connection stays open until then.
pub struct ObjectContent {
    stream: BoxStream<'static, StorageResult<Bytes>>,
}

impl ObjectContent {
    pub fn new<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = ClientResult<Bytes>> + Send + 'static,
    {
        Self {
            stream: stream.map_err(StorageError::from).boxed(),
        }
    }

    /// Content that is already fully in memory.
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self {
            stream: stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    pub fn into_stream(self) -> BoxStream<'static, StorageResult<Bytes>> {
        self.stream
    }

    /// Drain the stream and collect the full content.
    pub async fn bytes(self) -> StorageResult<Bytes> {
        let mut stream = self.stream;
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectContent").finish_non_exhaustive()
    }
}

/// Port for the raw object-store client capability.
///
/// This abstracts the actual storage backend (MinIO, S3, in-memory). The
/// core never constructs network connections itself; every primitive below
/// maps to exactly one store call.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync + 'static {
    /// Check whether a bucket exists.
    async fn bucket_exists(&self, bucket: &BucketName) -> ClientResult<bool>;

    /// Create a bucket. Reports [`ClientError::BucketAlreadyExists`] if it
    /// is already there; callers decide whether that counts as success.
    async fn create_bucket(&self, bucket: &BucketName) -> ClientResult<()>;

    /// Metadata lookup for a single object. [`ClientError::NoSuchKey`] when
    /// the store reports the object as absent.
    async fn stat_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<ObjectInfo>;

    /// Write an object with an exact, known length.
    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> ClientResult<()>;

    /// Read an object, optionally restricted to `[offset, offset + length)`.
    /// Out-of-range requests surface whatever error the store reports.
    async fn get_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        range: Option<(u64, u64)>,
    ) -> ClientResult<ObjectContent>;

    /// Issue a GET-only presigned URL valid for `expiry`.
    async fn presigned_get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiry: Duration,
    ) -> ClientResult<String>;

    /// Remove exactly one object.
    async fn remove_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<()>;

    /// Remove many objects in a single bulk call, reporting a per-key
    /// outcome for each. Partial failure is expected and not an `Err`.
    async fn remove_objects(
        &self,
        bucket: &BucketName,
        keys: Vec<String>,
    ) -> ClientResult<Vec<DeletionOutcome>>;

    /// List objects in store order, optionally under a prefix. With
    /// `recursive` unset the listing stops at the first `/` past the prefix.
    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: Option<&str>,
        recursive: bool,
    ) -> ClientResult<Vec<ObjectInfo>>;
}
