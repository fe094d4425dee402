use std::sync::Arc;

use anyhow::{Result, bail};

use super::StorageInstance;
use super::memory::MemoryStorage;

/// Builds a storage backend from a connection string, dispatching on
/// the scheme prefix.
pub async fn create_storage_from_connection_string(
    connection_string: &str,
) -> Result<Arc<dyn StorageInstance>> {
    Ok(match connection_string {
        s if s.starts_with("memory:") => Arc::new(MemoryStorage::connect(s)?),

        _ => bail!("Unsupported storage type: {}", connection_string),
    })
}
