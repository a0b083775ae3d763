mod managed_service_impl;
mod storage_service_impl;

pub use managed_service_impl::ManagedStorageServiceImpl;
pub use storage_service_impl::StorageServiceImpl;
