//! In-process sequence storage.
//!
//! Counters live for the lifetime of the store and are lost on restart.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::domain::{MAX_SEQUENCE_VALUE, SequenceRange};
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::SequenceStore;

/// Day counters held in memory, one atomic per key.
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    counters: DashMap<String, AtomicU64>,
}

impl MemorySequenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceStore for MemorySequenceStore {
    fn reserve(&self, key: &str, count: NonZeroU32) -> StorageResult<SequenceRange> {
        let count = u64::from(count.get());

        let counter = self
            .counters
            .entry(key.to_string())
            .or_insert_with(|| AtomicU64::new(0));

        let previous = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current
                    .checked_add(count)
                    .filter(|end| *end <= MAX_SEQUENCE_VALUE)
            })
            .map_err(|_| StorageError::Exhausted(key.to_string()))?;

        Ok(SequenceRange::new(previous + 1, previous + count))
    }

    fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
