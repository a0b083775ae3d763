use std::sync::Arc;

use bytes::Bytes;
use object_store_facade::{
    BucketName, InMemoryStoreClient, ManagedStorageService, ManagedStorageServiceImpl, ObjectKey,
    StorageError, StorageService,
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

async fn seed(service: &ManagedStorageServiceImpl, bucket: &BucketName, keys: &[&str]) {
    for name in keys {
        service
            .upload_file(bucket, &key(name), Bytes::from_static(b"x"))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn pagination_windows_the_listing_in_store_order() {
    let (_, service) = service_with_client();
    let bucket = bucket("page-bucket");
    seed(
        &service,
        &bucket,
        &["file1.txt", "file2.txt", "file3.txt", "file4.txt", "file5.txt"],
    )
    .await;

    let page = service.list_objects_by_page(&bucket, 1, 2).await.unwrap();
    assert_eq!(page, vec!["file3.txt", "file4.txt"]);

    let first = service.list_objects_by_page(&bucket, 0, 3).await.unwrap();
    assert_eq!(first, vec!["file1.txt", "file2.txt", "file3.txt"]);

    // A short final page.
    let last = service.list_objects_by_page(&bucket, 2, 2).await.unwrap();
    assert_eq!(last, vec!["file5.txt"]);
}

#[tokio::test]
async fn pagination_beyond_the_end_is_empty_not_an_error() {
    let (_, service) = service_with_client();
    let bucket = bucket("page-bucket");
    seed(&service, &bucket, &["file1.txt", "file2.txt", "file3.txt"]).await;

    let page = service.list_objects_by_page(&bucket, 10, 2).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn negative_page_fails_before_any_network_call() {
    let (client, service) = service_with_client();
    let bucket = bucket("page-bucket");

    let err = service
        .list_objects_by_page(&bucket, -1, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidArgument { .. }));
    assert_eq!(err.to_string(), "Page must be >= 0");
    assert_eq!(client.list_calls(), 0);
}

#[tokio::test]
async fn zero_page_size_fails_before_any_network_call() {
    let (client, service) = service_with_client();
    let bucket = bucket("page-bucket");

    let err = service
        .list_objects_by_page(&bucket, 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidArgument { .. }));
    assert_eq!(err.to_string(), "Page size must be >= 1");
    assert_eq!(client.list_calls(), 0);
}

#[tokio::test]
async fn pagination_wraps_listing_failures() {
    let (client, service) = service_with_client();
    let bucket = bucket("page-bucket");
    seed(&service, &bucket, &["file1.txt"]).await;

    client.fail_listing();
    let err = service
        .list_objects_by_page(&bucket, 0, 10)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("[StorageError]"));
}

#[tokio::test]
async fn delete_folder_only_matches_under_the_separator() {
    let (client, service) = service_with_client();
    let bucket = bucket("folder-bucket");
    seed(
        &service,
        &bucket,
        &["folder/a.txt", "folder/sub/b.txt", "folder2/c.txt"],
    )
    .await;

    service.delete_folder(&bucket, "folder").await.unwrap();

    assert!(!service.file_exists(&bucket, &key("folder/a.txt")).await.unwrap());
    assert!(!service
        .file_exists(&bucket, &key("folder/sub/b.txt"))
        .await
        .unwrap());
    // "folder2" merely shares the prefix string and must survive.
    assert!(service.file_exists(&bucket, &key("folder2/c.txt")).await.unwrap());

    assert_eq!(client.bulk_delete_calls(), 1);
}

#[tokio::test]
async fn delete_folder_accepts_an_already_normalized_prefix() {
    let (_, service) = service_with_client();
    let bucket = bucket("folder-bucket");
    seed(&service, &bucket, &["folder/a.txt", "folder2/c.txt"]).await;

    service.delete_folder(&bucket, "folder/").await.unwrap();

    assert!(!service.file_exists(&bucket, &key("folder/a.txt")).await.unwrap());
    assert!(service.file_exists(&bucket, &key("folder2/c.txt")).await.unwrap());
}

#[tokio::test]
async fn delete_folder_with_no_matches_issues_no_delete_call() {
    let (client, service) = service_with_client();
    let bucket = bucket("folder-bucket");
    seed(&service, &bucket, &["other/a.txt"]).await;

    service.delete_folder(&bucket, "empty-folder").await.unwrap();

    assert_eq!(client.bulk_delete_calls(), 0);
    assert!(service.file_exists(&bucket, &key("other/a.txt")).await.unwrap());
}

#[tokio::test]
async fn delete_folder_fails_on_first_per_key_error() {
    let (client, service) = service_with_client();
    let bucket = bucket("folder-bucket");
    seed(&service, &bucket, &["folder/a.txt", "folder/b.txt"]).await;

    client.fail_removal_of("folder/b.txt", "Access Denied");

    let err = service.delete_folder(&bucket, "folder").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("folder/b.txt"));
    assert!(message.contains("Access Denied"));

    // One bulk call went out; deletions the store applied stay applied.
    assert_eq!(client.bulk_delete_calls(), 1);
    assert!(!service.file_exists(&bucket, &key("folder/a.txt")).await.unwrap());
    assert!(service.file_exists(&bucket, &key("folder/b.txt")).await.unwrap());
}

#[tokio::test]
async fn document_url_expiration_is_given_in_days() {
    let (_, service) = service_with_client();
    let bucket = bucket("url-bucket");
    let key = key("report.pdf");
    seed(&service, &bucket, &["report.pdf"]).await;

    let url = service.get_document_url(&bucket, &key, 2).await.unwrap();
    assert!(url.contains("X-Amz-Expires=172800"));

    // Zero days falls through to the store default expiry.
    let url = service.get_document_url(&bucket, &key, 0).await.unwrap();
    assert!(url.contains("X-Amz-Expires=604800"));
}

#[tokio::test]
async fn negative_document_url_expiration_is_rejected() {
    let (_, service) = service_with_client();
    let bucket = bucket("url-bucket");

    let err = service
        .get_document_url(&bucket, &key("report.pdf"), -1)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidArgument { .. }));
}
