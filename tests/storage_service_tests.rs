use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use object_store_facade::{
    BucketName, InMemoryStoreClient, ManagedStorageServiceImpl, ObjectKey, StorageError,
    StorageService,
};

fn bucket(name: &str) -> BucketName {
    BucketName::new(name).unwrap()
}

fn key(name: &str) -> ObjectKey {
    ObjectKey::new(name).unwrap()
}

fn service_with_client() -> (Arc<InMemoryStoreClient>, ManagedStorageServiceImpl) {
    let client = Arc::new(InMemoryStoreClient::new());
    let service = ManagedStorageServiceImpl::new(client.clone());
    (client, service)
}

#[tokio::test]
async fn upload_download_round_trip() {
    let (_, service) = service_with_client();
    let bucket = bucket("round-trip");
    let key = key("test.txt");
    let data = Bytes::from("hello world");

    let stored = service
        .upload_file(&bucket, &key, data.clone())
        .await
        .unwrap();
    assert_eq!(stored, key);

    let content = service.download_file(&bucket, &key).await.unwrap();
    assert_eq!(content.bytes().await.unwrap(), data);
}

#[tokio::test]
async fn stream_upload_round_trip() {
    let (_, service) = service_with_client();
    let bucket = bucket("stream-bucket");
    let key = key("streamed.txt");

    // Chunked input with no usable length hint up front.
    let input = async_stream::stream! {
        yield Ok(Bytes::from_static(b"hello "));
        yield Ok(Bytes::from_static(b"streamed "));
        yield Ok(Bytes::from_static(b"world"));
    }
    .boxed();

    let stored = service
        .upload_file_stream(&bucket, &key, input)
        .await
        .unwrap();
    assert_eq!(stored, key);

    let content = service.download_file(&bucket, &key).await.unwrap();
    assert_eq!(
        content.bytes().await.unwrap(),
        Bytes::from("hello streamed world")
    );
}

#[tokio::test]
async fn stream_upload_surfaces_read_errors() {
    let (client, service) = service_with_client();
    let bucket = bucket("stream-bucket");
    let key = key("broken.txt");

    let input = async_stream::stream! {
        yield Ok(Bytes::from_static(b"partial"));
        yield Err(std::io::Error::new(std::io::ErrorKind::Other, "pipe broke"));
    }
    .boxed();

    let err = service
        .upload_file_stream(&bucket, &key, input)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read upload stream"));

    // Nothing was written; the failure happened before the store call.
    assert_eq!(client.create_bucket_calls(), 0);
}

#[tokio::test]
async fn upload_creates_missing_bucket_exactly_once() {
    let (client, service) = service_with_client();
    let bucket = bucket("fresh-bucket");

    service
        .upload_file(&bucket, &key("a.txt"), Bytes::from_static(b"a"))
        .await
        .unwrap();
    assert_eq!(client.create_bucket_calls(), 1);

    // Second upload sees the bucket and provisions nothing.
    service
        .upload_file(&bucket, &key("b.txt"), Bytes::from_static(b"b"))
        .await
        .unwrap();
    assert_eq!(client.create_bucket_calls(), 1);
}

#[tokio::test]
async fn read_paths_never_provision_buckets() {
    let (client, service) = service_with_client();
    let bucket = bucket("never-created");

    assert!(service.download_file(&bucket, &key("x")).await.is_err());
    assert!(service.file_exists(&bucket, &key("x")).await.is_err());
    let _ = service
        .get_url(&bucket, &key("x"), Duration::from_secs(60))
        .await;

    assert_eq!(client.create_bucket_calls(), 0);
}

#[tokio::test]
async fn file_exists_maps_not_found_to_false() {
    let (_, service) = service_with_client();
    let bucket = bucket("exists-bucket");

    service
        .upload_file(&bucket, &key("present.txt"), Bytes::from_static(b"x"))
        .await
        .unwrap();

    assert!(service.file_exists(&bucket, &key("present.txt")).await.unwrap());
    assert!(!service.file_exists(&bucket, &key("absent.txt")).await.unwrap());
}

#[tokio::test]
async fn file_exists_propagates_non_not_found_failures() {
    let (client, service) = service_with_client();
    let bucket = bucket("exists-bucket");

    service
        .upload_file(&bucket, &key("present.txt"), Bytes::from_static(b"x"))
        .await
        .unwrap();

    client.fail_stat_objects();
    let err = service
        .file_exists(&bucket, &key("present.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Operation { .. }));
}

// The existence-check asymmetry is deliberate: bucket checks swallow every
// failure into `false`, object checks only absorb not-found.
#[tokio::test]
async fn bucket_exists_swallows_check_failures() {
    let (client, service) = service_with_client();
    let bucket = bucket("swallow-bucket");

    service
        .upload_file(&bucket, &key("x"), Bytes::from_static(b"x"))
        .await
        .unwrap();
    assert!(service.bucket_exists(&bucket).await);

    client.fail_bucket_checks();
    assert!(!service.bucket_exists(&bucket).await);
}

#[tokio::test]
async fn chunked_download_returns_requested_range() {
    let (_, service) = service_with_client();
    let bucket = bucket("chunk-bucket");
    let key = key("digits.bin");

    service
        .upload_file(&bucket, &key, Bytes::from_static(b"0123456789"))
        .await
        .unwrap();

    let middle = service
        .download_chunked_file(&bucket, &key, 2, 4)
        .await
        .unwrap();
    assert_eq!(middle.bytes().await.unwrap(), Bytes::from_static(b"2345"));

    // Offset 0 with the full length equals a whole-object download.
    let full = service
        .download_chunked_file(&bucket, &key, 0, 10)
        .await
        .unwrap();
    assert_eq!(
        full.bytes().await.unwrap(),
        Bytes::from_static(b"0123456789")
    );
}

#[tokio::test]
async fn chunked_download_out_of_range_is_a_store_error() {
    let (_, service) = service_with_client();
    let bucket = bucket("chunk-bucket");
    let key = key("small.bin");

    service
        .upload_file(&bucket, &key, Bytes::from_static(b"abc"))
        .await
        .unwrap();

    let err = service
        .download_chunked_file(&bucket, &key, 20, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Operation { .. }));
    assert!(err.to_string().starts_with("[StorageError]"));
}

#[tokio::test]
async fn presigned_url_names_bucket_key_and_expiry() {
    let (_, service) = service_with_client();
    let bucket = bucket("url-bucket");
    let key = key("doc.pdf");

    service
        .upload_file(&bucket, &key, Bytes::from_static(b"pdf"))
        .await
        .unwrap();

    let url = service
        .get_url(&bucket, &key, Duration::from_secs(3600))
        .await
        .unwrap();
    assert!(url.contains("url-bucket/doc.pdf"));
    assert!(url.contains("X-Amz-Expires=3600"));
}

#[tokio::test]
async fn zero_expiration_means_store_default_not_expired() {
    let (_, service) = service_with_client();
    let bucket = bucket("url-bucket");
    let key = key("doc.pdf");

    let url = service.get_url(&bucket, &key, Duration::ZERO).await.unwrap();
    // Seven days, the store default.
    assert!(url.contains("X-Amz-Expires=604800"));
}

#[tokio::test]
async fn delete_file_removes_single_object() {
    let (_, service) = service_with_client();
    let bucket = bucket("delete-bucket");

    service
        .upload_file(&bucket, &key("keep.txt"), Bytes::from_static(b"k"))
        .await
        .unwrap();
    service
        .upload_file(&bucket, &key("drop.txt"), Bytes::from_static(b"d"))
        .await
        .unwrap();

    service.delete_file(&bucket, &key("drop.txt")).await.unwrap();

    assert!(!service.file_exists(&bucket, &key("drop.txt")).await.unwrap());
    assert!(service.file_exists(&bucket, &key("keep.txt")).await.unwrap());
}
