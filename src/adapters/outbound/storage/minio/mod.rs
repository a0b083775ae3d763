mod minio;

pub use minio::MinioStoreClient;
