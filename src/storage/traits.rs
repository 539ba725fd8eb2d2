//! Storage trait definitions.
//!
//! The generator only needs one thing from a backend: hand out day-counter
//! values that are never handed out twice.

use std::num::NonZeroU32;

use crate::domain::SequenceRange;
use crate::error::StorageResult;

/// Per-key sequence counters.
///
/// Implementations must make [`SequenceStore::reserve`] atomic: concurrent
/// callers never observe overlapping ranges for the same key.
pub trait SequenceStore: Send + Sync {
    /// Reserve the next `count` values for `key`.
    ///
    /// Counters start at 1 and are created on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Exhausted` when the counter would pass
    /// `MAX_SEQUENCE_VALUE`, or a backend error.
    fn reserve(&self, key: &str, count: NonZeroU32) -> StorageResult<SequenceRange>;

    /// Check if the backend is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or not writable.
    fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend name.
    fn backend_name(&self) -> &'static str;
}
