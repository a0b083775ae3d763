pub mod services;
pub mod storage;

pub use services::{ManagedStorageService, StorageService};
pub use storage::{
    ClientError, ClientResult, DeletionOutcome, ObjectContent, ObjectInfo, ObjectStoreClient,
    UploadStream,
};
