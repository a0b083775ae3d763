mod store_client;

pub use store_client::{
    ClientError, ClientResult, DeletionOutcome, ObjectContent, ObjectInfo, ObjectStoreClient,
    UploadStream,
};
