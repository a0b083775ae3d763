pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - configuration, identifiers, errors
pub use domain::{
    BucketName, ObjectKey, StorageError, StorageResult, StoreConfiguration, ValidationError,
};

// Port types - the client capability and the service contracts
pub use ports::{
    ClientError, DeletionOutcome, ManagedStorageService, ObjectContent, ObjectInfo,
    ObjectStoreClient, StorageService, UploadStream,
};

// Service implementations
pub use services::{ManagedStorageServiceImpl, StorageServiceImpl};

// Application factory and configuration
pub use app::{AppBuilder, AppError, StorageBackend, create_in_memory_storage, create_minio_storage};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{InMemoryStoreClient, MinioStoreClient};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        BucketName, InMemoryStoreClient, ManagedStorageService, ManagedStorageServiceImpl,
        MinioStoreClient, ObjectKey, ObjectStoreClient, StorageService, StoreConfiguration,
        create_in_memory_storage, create_minio_storage,
    };
}
