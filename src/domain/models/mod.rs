mod config;

pub use config::StoreConfiguration;
