pub mod error;
mod in_memory;
pub mod minio;

pub use in_memory::InMemoryStoreClient;
pub use minio::MinioStoreClient;
