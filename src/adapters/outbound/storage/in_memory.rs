use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    domain::value_objects::{BucketName, ObjectKey},
    ports::storage::{
        ClientError, ClientResult, DeletionOutcome, ObjectContent, ObjectInfo, ObjectStoreClient,
    },
};

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
    etag: String,
}

#[derive(Default)]
struct StoreData {
    // BTreeMap keeps keys in the lexicographic order S3 yields.
    buckets: HashMap<String, BTreeMap<String, StoredObject>>,
}

#[derive(Default)]
struct FaultPlan {
    fail_bucket_checks: bool,
    fail_stat_objects: bool,
    fail_listing: bool,
    removal_failures: HashMap<String, String>,
}

/// In-memory implementation of [`ObjectStoreClient`] for testing and
/// development.
///
/// Behaves like the real store where it matters for the service layer:
/// writes into a missing bucket fail with `NoSuchBucket`, listings come back
/// in key order, and bulk deletes report a per-key outcome. Call counters
/// and fault injection let tests assert how many store calls an operation
/// made and how failures propagate.
pub struct InMemoryStoreClient {
    endpoint: String,
    data: RwLock<StoreData>,
    faults: Mutex<FaultPlan>,
    create_bucket_calls: AtomicU64,
    bulk_delete_calls: AtomicU64,
    list_calls: AtomicU64,
}

impl InMemoryStoreClient {
    pub fn new() -> Self {
        Self {
            endpoint: "http://in-memory.localhost".to_string(),
            data: RwLock::new(StoreData::default()),
            faults: Mutex::new(FaultPlan::default()),
            create_bucket_calls: AtomicU64::new(0),
            bulk_delete_calls: AtomicU64::new(0),
            list_calls: AtomicU64::new(0),
        }
    }

    /// Make every subsequent bucket existence check fail.
    pub fn fail_bucket_checks(&self) {
        self.faults.lock().unwrap().fail_bucket_checks = true;
    }

    /// Make every subsequent stat lookup fail with a non-not-found error.
    pub fn fail_stat_objects(&self) {
        self.faults.lock().unwrap().fail_stat_objects = true;
    }

    /// Make every subsequent listing fail.
    pub fn fail_listing(&self) {
        self.faults.lock().unwrap().fail_listing = true;
    }

    /// Report a per-key failure for `key` in the next bulk delete instead
    /// of removing it.
    pub fn fail_removal_of(&self, key: impl Into<String>, reason: impl Into<String>) {
        self.faults
            .lock()
            .unwrap()
            .removal_failures
            .insert(key.into(), reason.into());
    }

    pub fn create_bucket_calls(&self) -> u64 {
        self.create_bucket_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_delete_calls(&self) -> u64 {
        self.bulk_delete_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryStoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStoreClient for InMemoryStoreClient {
    async fn bucket_exists(&self, bucket: &BucketName) -> ClientResult<bool> {
        if self.faults.lock().unwrap().fail_bucket_checks {
            return Err(ClientError::Other(
                "injected bucket check failure".to_string(),
            ));
        }
        let data = self.data.read().await;
        Ok(data.buckets.contains_key(bucket.as_str()))
    }

    async fn create_bucket(&self, bucket: &BucketName) -> ClientResult<()> {
        self.create_bucket_calls.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.write().await;
        if data.buckets.contains_key(bucket.as_str()) {
            return Err(ClientError::BucketAlreadyExists {
                bucket: bucket.as_str().to_string(),
            });
        }
        data.buckets
            .insert(bucket.as_str().to_string(), BTreeMap::new());
        Ok(())
    }

    async fn stat_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<ObjectInfo> {
        if self.faults.lock().unwrap().fail_stat_objects {
            return Err(ClientError::Other("injected stat failure".to_string()));
        }
        let data = self.data.read().await;
        let objects = data
            .buckets
            .get(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;
        let stored = objects
            .get(key.as_str())
            .ok_or_else(|| ClientError::NoSuchKey {
                key: key.as_str().to_string(),
            })?;
        Ok(ObjectInfo {
            key: key.as_str().to_string(),
            size: stored.data.len() as u64,
            last_modified: stored.last_modified,
            etag: Some(stored.etag.clone()),
        })
    }

    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> ClientResult<()> {
        let mut data = self.data.write().await;
        let objects = data
            .buckets
            .get_mut(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;
        let etag = format!("{:x}", md5::compute(&content));
        objects.insert(
            key.as_str().to_string(),
            StoredObject {
                data: content,
                last_modified: Utc::now(),
                etag,
            },
        );
        Ok(())
    }

    async fn get_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        range: Option<(u64, u64)>,
    ) -> ClientResult<ObjectContent> {
        let data = self.data.read().await;
        let objects = data
            .buckets
            .get(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;
        let stored = objects
            .get(key.as_str())
            .ok_or_else(|| ClientError::NoSuchKey {
                key: key.as_str().to_string(),
            })?;

        let bytes = match range {
            None => stored.data.clone(),
            Some((offset, length)) => {
                let len = stored.data.len() as u64;
                if offset >= len {
                    // What S3 reports for a start past the end of the object.
                    return Err(ClientError::Http {
                        status: http::StatusCode::RANGE_NOT_SATISFIABLE,
                        message: format!(
                            "Requested range [{}, {}) not satisfiable for object of {} bytes",
                            offset,
                            offset + length,
                            len
                        ),
                    });
                }
                let end = (offset + length).min(len);
                stored.data.slice(offset as usize..end as usize)
            }
        };

        Ok(ObjectContent::from_bytes(bytes))
    }

    async fn presigned_get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiry: Duration,
    ) -> ClientResult<String> {
        // Fabricated but shaped like the real thing; nothing verifies it.
        Ok(format!(
            "{}/{}/{}?X-Amz-Expires={}",
            self.endpoint,
            bucket.as_str(),
            key.as_str(),
            expiry.as_secs()
        ))
    }

    async fn remove_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<()> {
        let mut data = self.data.write().await;
        let objects = data
            .buckets
            .get_mut(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;
        // Deleting a missing object is a no-op, as in S3.
        objects.remove(key.as_str());
        Ok(())
    }

    async fn remove_objects(
        &self,
        bucket: &BucketName,
        keys: Vec<String>,
    ) -> ClientResult<Vec<DeletionOutcome>> {
        self.bulk_delete_calls.fetch_add(1, Ordering::SeqCst);
        let failures = self.faults.lock().unwrap().removal_failures.clone();
        let mut data = self.data.write().await;
        let objects = data
            .buckets
            .get_mut(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;

        let mut outcomes = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(reason) = failures.get(&key) {
                outcomes.push(DeletionOutcome::Failed {
                    key,
                    reason: reason.clone(),
                });
            } else {
                objects.remove(&key);
                outcomes.push(DeletionOutcome::Deleted { key });
            }
        }
        Ok(outcomes)
    }

    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: Option<&str>,
        recursive: bool,
    ) -> ClientResult<Vec<ObjectInfo>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.lock().unwrap().fail_listing {
            return Err(ClientError::Other("injected listing failure".to_string()));
        }
        let data = self.data.read().await;
        let objects = data
            .buckets
            .get(bucket.as_str())
            .ok_or_else(|| ClientError::NoSuchBucket {
                bucket: bucket.as_str().to_string(),
            })?;

        let prefix = prefix.unwrap_or("");
        let listing = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| recursive || !key[prefix.len()..].contains('/'))
            .map(|(key, stored)| ObjectInfo {
                key: key.clone(),
                size: stored.data.len() as u64,
                last_modified: stored.last_modified,
                etag: Some(stored.etag.clone()),
            })
            .collect();

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_is_key_ordered_and_prefix_filtered() {
        let client = InMemoryStoreClient::new();
        let bucket = BucketName::new("bucket").unwrap();
        client.create_bucket(&bucket).await.unwrap();

        for key in ["b/2.txt", "a/1.txt", "a/sub/3.txt", "c.txt"] {
            let key = ObjectKey::new(key).unwrap();
            client
                .put_object(&bucket, &key, Bytes::from_static(b"x"))
                .await
                .unwrap();
        }

        let all = client.list_objects(&bucket, None, true).await.unwrap();
        let keys: Vec<_> = all.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1.txt", "a/sub/3.txt", "b/2.txt", "c.txt"]);

        let shallow = client.list_objects(&bucket, Some("a/"), false).await.unwrap();
        let keys: Vec<_> = shallow.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1.txt"]);
    }

    #[tokio::test]
    async fn put_into_missing_bucket_fails() {
        let client = InMemoryStoreClient::new();
        let bucket = BucketName::new("nope").unwrap();
        let key = ObjectKey::new("k").unwrap();

        let err = client
            .put_object(&bucket, &key, Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NoSuchBucket { .. }));
    }
}
