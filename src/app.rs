use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{InMemoryStoreClient, MinioStoreClient},
    domain::models::StoreConfiguration,
    ports::storage::ObjectStoreClient,
    services::ManagedStorageServiceImpl,
};

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Minio(StoreConfiguration),
}

/// Application builder wiring a backend into the service stack.
///
/// The built service owns the single long-lived client handle; dropping the
/// service releases it. There is no process-wide singleton.
pub struct AppBuilder {
    backend: StorageBackend,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::InMemory,
        }
    }

    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn build(self) -> Result<ManagedStorageServiceImpl, AppError> {
        let client: Arc<dyn ObjectStoreClient> = match self.backend {
            StorageBackend::InMemory => Arc::new(InMemoryStoreClient::new()),
            StorageBackend::Minio(config) => {
                Arc::new(MinioStoreClient::new(&config).map_err(|e| AppError::StorageInit {
                    message: e.to_string(),
                })?)
            }
        };

        Ok(ManagedStorageServiceImpl::new(client))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

impl From<crate::domain::errors::ValidationError> for AppError {
    fn from(err: crate::domain::errors::ValidationError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Create an in-memory storage service for testing and development
pub fn create_in_memory_storage() -> ManagedStorageServiceImpl {
    ManagedStorageServiceImpl::new(Arc::new(InMemoryStoreClient::new()))
}

/// Create a MinIO-backed storage service
pub fn create_minio_storage(
    config: StoreConfiguration,
) -> Result<ManagedStorageServiceImpl, AppError> {
    AppBuilder::new()
        .with_backend(StorageBackend::Minio(config))
        .build()
}
