pub mod error;
pub mod memory;
pub mod query;
pub mod storage;
pub mod storage_factory;

pub use error::StorageError;
pub use storage::StorageInstance;
