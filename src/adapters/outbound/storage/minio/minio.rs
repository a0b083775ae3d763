use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{GetOptions, GetRange, ObjectStore as _, PutPayload};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    adapters::outbound::storage::error::{http_status, object_error},
    domain::{
        models::StoreConfiguration,
        value_objects::{BucketName, ObjectKey},
    },
    ports::storage::{
        ClientError, ClientResult, DeletionOutcome, ObjectContent, ObjectInfo, ObjectStoreClient,
    },
};

const DEFAULT_REGION: &str = "us-east-1";

/// [`ObjectStoreClient`] backed by a MinIO (or any S3-compatible) server.
///
/// Object-level I/O, listing and presigning go through the apache
/// `object_store` crate with one `AmazonS3` handle per bucket. Bucket
/// administration and the Multi-Object Delete call are not covered by that
/// crate, so they speak the S3 REST dialect directly over `reqwest`.
pub struct MinioStoreClient {
    http: Client,
    endpoint: String,
    access_key: String,
    secret_key: String,
    region: String,
    allow_http: bool,
    stores: RwLock<HashMap<String, Arc<AmazonS3>>>,
}

impl MinioStoreClient {
    pub fn new(config: &StoreConfiguration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            access_key: config.access_key().to_string(),
            secret_key: config.secret_key().to_string(),
            region: config
                .region()
                .unwrap_or(DEFAULT_REGION)
                .to_string(),
            allow_http: !config.use_tls(),
            stores: RwLock::new(HashMap::new()),
        })
    }

    /// Per-bucket `AmazonS3` handle, built lazily and cached for the
    /// lifetime of the client.
    async fn bucket_store(&self, bucket: &BucketName) -> ClientResult<Arc<AmazonS3>> {
        {
            let stores = self.stores.read().await;
            if let Some(store) = stores.get(bucket.as_str()) {
                return Ok(store.clone());
            }
        }

        let store = AmazonS3Builder::new()
            .with_endpoint(&self.endpoint)
            .with_bucket_name(bucket.as_str())
            .with_region(&self.region)
            .with_access_key_id(&self.access_key)
            .with_secret_access_key(&self.secret_key)
            .with_allow_http(self.allow_http)
            .with_virtual_hosted_style_request(false)
            .build()?;

        let store = Arc::new(store);
        let mut stores = self.stores.write().await;
        Ok(stores
            .entry(bucket.as_str().to_string())
            .or_insert(store)
            .clone())
    }

    fn bucket_url(&self, bucket: &BucketName) -> String {
        format!("{}/{}", self.endpoint, bucket.as_str())
    }
}

#[async_trait]
impl ObjectStoreClient for MinioStoreClient {
    async fn bucket_exists(&self, bucket: &BucketName) -> ClientResult<bool> {
        let response = self
            .http
            .head(self.bucket_url(bucket))
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status.as_u16() == 404 {
            Ok(false)
        } else {
            Err(ClientError::Http {
                status: http_status(status),
                message: format!("Bucket check failed for {}", bucket),
            })
        }
    }

    async fn create_bucket(&self, bucket: &BucketName) -> ClientResult<()> {
        let response = self
            .http
            .put(self.bucket_url(bucket))
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(bucket = %bucket, "bucket created");
            return Ok(());
        }
        if status.as_u16() == 409 {
            return Err(ClientError::BucketAlreadyExists {
                bucket: bucket.as_str().to_string(),
            });
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Http {
            status: http_status(status),
            message: format!("Failed to create bucket {}: {}", bucket, message),
        })
    }

    async fn stat_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<ObjectInfo> {
        let store = self.bucket_store(bucket).await?;
        let path = ObjectPath::from(key.as_str());

        let meta = store
            .head(&path)
            .await
            .map_err(|e| object_error(e, key))?;

        Ok(ObjectInfo {
            key: meta.location.to_string(),
            size: meta.size,
            last_modified: meta.last_modified,
            etag: meta.e_tag,
        })
    }

    async fn put_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        content: Bytes,
    ) -> ClientResult<()> {
        let store = self.bucket_store(bucket).await?;
        let path = ObjectPath::from(key.as_str());

        store.put(&path, PutPayload::from(content)).await?;
        Ok(())
    }

    async fn get_object(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        range: Option<(u64, u64)>,
    ) -> ClientResult<ObjectContent> {
        let store = self.bucket_store(bucket).await?;
        let path = ObjectPath::from(key.as_str());

        let options = GetOptions {
            range: range.map(|(offset, length)| GetRange::Bounded(offset..offset + length)),
            ..Default::default()
        };

        let result = store
            .get_opts(&path, options)
            .await
            .map_err(|e| object_error(e, key))?;

        Ok(ObjectContent::new(
            result.into_stream().map_err(ClientError::from),
        ))
    }

    async fn presigned_get_url(
        &self,
        bucket: &BucketName,
        key: &ObjectKey,
        expiry: Duration,
    ) -> ClientResult<String> {
        let store = self.bucket_store(bucket).await?;
        let path = ObjectPath::from(key.as_str());

        let url = store
            .signed_url(http::Method::GET, &path, expiry)
            .await?;
        Ok(url.to_string())
    }

    async fn remove_object(&self, bucket: &BucketName, key: &ObjectKey) -> ClientResult<()> {
        let store = self.bucket_store(bucket).await?;
        let path = ObjectPath::from(key.as_str());

        store.delete(&path).await.map_err(|e| object_error(e, key))?;
        Ok(())
    }

    async fn remove_objects(
        &self,
        bucket: &BucketName,
        keys: Vec<String>,
    ) -> ClientResult<Vec<DeletionOutcome>> {
        let body = delete_request_to_xml(&keys)?;
        let url = format!("{}?delete", self.bucket_url(bucket));

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .header("Content-Type", "application/xml")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: http_status(status),
                message: format!("Bulk delete failed: {}", message),
            });
        }

        let xml = response.text().await?;
        parse_delete_result(&xml)
    }

    async fn list_objects(
        &self,
        bucket: &BucketName,
        prefix: Option<&str>,
        recursive: bool,
    ) -> ClientResult<Vec<ObjectInfo>> {
        let store = self.bucket_store(bucket).await?;
        let prefix_path = prefix.map(ObjectPath::from);

        let metas = if recursive {
            let mut stream = store.list(prefix_path.as_ref());
            let mut metas = Vec::new();
            while let Some(meta) = stream.next().await {
                metas.push(meta?);
            }
            metas
        } else {
            store
                .list_with_delimiter(prefix_path.as_ref())
                .await?
                .objects
        };

        Ok(metas
            .into_iter()
            .map(|meta| ObjectInfo {
                key: meta.location.to_string(),
                size: meta.size,
                last_modified: meta.last_modified,
                etag: meta.e_tag,
            })
            .collect())
    }
}

fn xml_err(context: &str, err: impl std::fmt::Display) -> ClientError {
    ClientError::Other(format!("{}: {}", context, err))
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> ClientResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| xml_err("Failed to write XML element start", e))?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| xml_err("Failed to write XML element text", e))?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| xml_err("Failed to write XML element end", e))?;
    Ok(())
}

/// Build the S3 Multi-Object Delete request body.
fn delete_request_to_xml(keys: &[String]) -> ClientResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| xml_err("Failed to write XML declaration", e))?;
    writer
        .write_event(Event::Start(BytesStart::new("Delete")))
        .map_err(|e| xml_err("Failed to write Delete start", e))?;

    for key in keys {
        writer
            .write_event(Event::Start(BytesStart::new("Object")))
            .map_err(|e| xml_err("Failed to write Object start", e))?;
        write_text_element(&mut writer, "Key", key)?;
        writer
            .write_event(Event::End(BytesEnd::new("Object")))
            .map_err(|e| xml_err("Failed to write Object end", e))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Delete")))
        .map_err(|e| xml_err("Failed to write Delete end", e))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| xml_err("Delete request is not valid UTF-8", e))
}

/// Parse the S3 DeleteResult response into per-key outcomes.
fn parse_delete_result(xml: &str) -> ClientResult<Vec<DeletionOutcome>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.trim_text(true);

    let mut outcomes = Vec::new();
    let mut buf = Vec::new();

    // Section of the result we are inside, plus fields collected so far.
    let mut in_deleted = false;
    let mut in_error = false;
    let mut current_key: Option<String> = None;
    let mut current_code: Option<String> = None;
    let mut current_message: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"Deleted" => in_deleted = true,
                b"Error" => in_error = true,
                b"Key" if in_deleted || in_error => {
                    buf.clear();
                    let text = read_element_text(&mut reader, &mut buf)?;
                    current_key = Some(text);
                }
                b"Code" if in_error => {
                    buf.clear();
                    let text = read_element_text(&mut reader, &mut buf)?;
                    current_code = Some(text);
                }
                b"Message" if in_error => {
                    buf.clear();
                    let text = read_element_text(&mut reader, &mut buf)?;
                    current_message = Some(text);
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"Deleted" => {
                    in_deleted = false;
                    if let Some(key) = current_key.take() {
                        outcomes.push(DeletionOutcome::Deleted { key });
                    }
                }
                b"Error" => {
                    in_error = false;
                    if let Some(key) = current_key.take() {
                        let reason = match (current_code.take(), current_message.take()) {
                            (Some(code), Some(message)) => format!("{}: {}", code, message),
                            (Some(code), None) => code,
                            (None, Some(message)) => message,
                            (None, None) => "unknown error".to_string(),
                        };
                        outcomes.push(DeletionOutcome::Failed { key, reason });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err("Error parsing DeleteResult XML", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(outcomes)
}

fn read_element_text<T: std::io::BufRead>(
    reader: &mut quick_xml::Reader<T>,
    buf: &mut Vec<u8>,
) -> ClientResult<String> {
    match reader.read_event_into(buf) {
        Ok(Event::Text(e)) => {
            let text = e
                .unescape()
                .map_err(|e| xml_err("Failed to unescape XML text", e))?;
            Ok(text.to_string())
        }
        _ => Err(ClientError::Other("Expected XML text content".to_string())),
    }
}
