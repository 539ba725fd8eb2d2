//! Storage backend factory.
//!
//! Creates the appropriate sequence store based on configuration.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::AppError;
use crate::storage::file::FileSequenceStore;
use crate::storage::memory::MemorySequenceStore;
use crate::storage::traits::SequenceStore;

/// Create a sequence store based on configuration.
///
/// # Errors
///
/// Returns an error if the storage backend cannot be initialized.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn SequenceStore>, AppError> {
    let store: Arc<dyn SequenceStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemorySequenceStore::new()),
        StorageBackend::File => Arc::new(FileSequenceStore::new(&config.file)?),
    };

    // Verify storage is healthy
    store.health_check()?;

    info!(backend = store.backend_name(), "Sequence store initialized");
    Ok(store)
}
