mod storage_service;

pub use storage_service::{ManagedStorageService, StorageService};
