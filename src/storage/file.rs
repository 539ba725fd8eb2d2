//! File-based sequence storage.
//!
//! Each day counter is a small JSON file guarded by an exclusive lock on a
//! sibling lock file, so counters survive restarts and are shared by every
//! process on the host that points at the same data directory. State is
//! replaced by write-then-rename; a crash never leaves a truncated counter.
//!
//! Directory structure:
//! ```text
//! data/
//! └── sequences/
//!     ├── {key}.json
//!     └── {key}.lock
//! ```
//!
//! Note: file locks may not work correctly on all network filesystems.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;

use crate::config::FileStorageConfig;
use crate::domain::{SequenceRange, SequenceState};
use crate::error::{StorageError, StorageResult};
use crate::storage::traits::SequenceStore;

/// File-based sequence storage implementation.
pub struct FileSequenceStore {
    /// Base data directory.
    base_dir: PathBuf,
    /// Directory for sequence files.
    sequences_dir: PathBuf,
    /// Serializes file operations within this process.
    lock: Mutex<()>,
}

impl FileSequenceStore {
    /// Create a new file sequence store.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directories cannot be created.
    pub fn new(config: &FileStorageConfig) -> StorageResult<Self> {
        let base_dir = config.data_dir.clone();
        let sequences_dir = base_dir.join("sequences");

        std::fs::create_dir_all(&sequences_dir).map_err(|e| {
            StorageError::FileIO(format!(
                "Failed to create directory {}: {e}",
                sequences_dir.display()
            ))
        })?;

        Ok(Self {
            base_dir,
            sequences_dir,
            lock: Mutex::new(()),
        })
    }

    /// Get the file path for a sequence.
    fn sequence_path(&self, key: &str) -> PathBuf {
        self.sequences_dir
            .join(format!("{}.json", sanitize_name(key)))
    }

    /// Get the lock file path for a sequence.
    fn lock_path(&self, key: &str) -> PathBuf {
        self.sequences_dir
            .join(format!("{}.lock", sanitize_name(key)))
    }

    /// Open (creating if needed) the lock file guarding `key`.
    fn open_lock(&self, key: &str) -> StorageResult<File> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(key))?)
    }

    /// Read the state stored at `path`, or a fresh one if it does not exist yet.
    ///
    /// An existing but empty file is corrupt, never a fresh counter.
    fn read_state(path: &Path, key: &str) -> StorageResult<SequenceState> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SequenceState::new(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file at `path` with `state`.
    ///
    /// The new contents go to a sibling temp file which is then renamed over
    /// `path`, so readers see either the old state or the new one.
    fn write_state(path: &Path, state: &SequenceState) -> StorageResult<()> {
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(state)?;
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Atomically update sequence state, creating it on first use.
    fn update_state<T, F>(&self, key: &str, update_fn: F) -> StorageResult<T>
    where
        F: FnOnce(&mut SequenceState) -> StorageResult<T>,
    {
        let _guard = self.lock.lock();

        let lock_file = self.open_lock(key)?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::LockFailed(e.to_string()))?;

        let path = self.sequence_path(key);
        let result = Self::read_state(&path, key).and_then(|mut state| {
            let value = update_fn(&mut state)?;
            Self::write_state(&path, &state)?;
            Ok(value)
        });

        FileExt::unlock(&lock_file).map_err(|e| StorageError::LockFailed(e.to_string()))?;
        result
    }
}

impl SequenceStore for FileSequenceStore {
    fn reserve(&self, key: &str, count: NonZeroU32) -> StorageResult<SequenceRange> {
        self.update_state(key, |state| {
            state
                .reserve(u64::from(count.get()))
                .ok_or_else(|| StorageError::Exhausted(key.to_string()))
        })
    }

    fn health_check(&self) -> StorageResult<()> {
        if !self.sequences_dir.is_dir() {
            return Err(StorageError::Unavailable);
        }

        // Try to create a test file
        let test_file = self.base_dir.join(".health_check");
        std::fs::write(&test_file, b"ok")
            .map_err(|e| StorageError::FileIO(format!("Health check failed: {e}")))?;
        std::fs::remove_file(&test_file)
            .map_err(|e| StorageError::FileIO(format!("Health check cleanup failed: {e}")))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Sanitize a name for use as a filename.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileSequenceStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = FileStorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
        };
        let store = FileSequenceStore::new(&config).unwrap();
        (store, temp_dir)
    }

    fn n(count: u32) -> NonZeroU32 {
        NonZeroU32::new(count).unwrap()
    }

    #[test]
    fn test_reserve_creates_and_advances() {
        let (store, _temp) = create_test_store();

        let range = store.reserve("20240601", n(1)).unwrap();
        assert_eq!(range, SequenceRange::new(1, 1));

        let range = store.reserve("20240601", n(3)).unwrap();
        assert_eq!(range, SequenceRange::new(2, 4));
    }

    #[test]
    fn test_counters_survive_reopen() {
        let (store, temp) = create_test_store();
        store.reserve("20240601", n(7)).unwrap();
        drop(store);

        let config = FileStorageConfig {
            data_dir: temp.path().to_path_buf(),
        };
        let reopened = FileSequenceStore::new(&config).unwrap();
        assert_eq!(reopened.reserve("20240601", n(1)).unwrap().start, 8);
    }

    #[test]
    fn test_state_file_is_json() {
        let (store, temp) = create_test_store();
        store.reserve("20240601", n(2)).unwrap();

        let raw =
            std::fs::read_to_string(temp.path().join("sequences").join("20240601.json")).unwrap();
        let state: SequenceState = serde_json::from_str(&raw).unwrap();
        assert_eq!(state.key, "20240601");
        assert_eq!(state.current_value, 2);
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_corrupt_state_is_reported() {
        let (store, temp) = create_test_store();
        std::fs::write(
            temp.path().join("sequences").join("20240601.json"),
            b"not json",
        )
        .unwrap();

        let err = store.reserve("20240601", n(1)).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_empty_state_file_is_not_a_fresh_counter() {
        let (store, temp) = create_test_store();
        store.reserve("20240601", n(5)).unwrap();
        std::fs::write(temp.path().join("sequences").join("20240601.json"), b"").unwrap();

        let err = store.reserve("20240601", n(1)).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_update_leaves_no_temp_file() {
        let (store, temp) = create_test_store();
        store.reserve("20240601", n(1)).unwrap();
        store.reserve("20240601", n(1)).unwrap();

        let sequences = temp.path().join("sequences");
        assert!(sequences.join("20240601.json").is_file());
        assert!(sequences.join("20240601.lock").is_file());
        assert!(!sequences.join("20240601.json.tmp").exists());
    }

    #[test]
    fn test_health_check() {
        let (store, _temp) = create_test_store();
        assert!(store.health_check().is_ok());
        assert_eq!(store.backend_name(), "file");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("20240601"), "20240601");
        assert_eq!(sanitize_name("with-dash"), "with-dash");
        assert_eq!(sanitize_name("with/slash"), "with_slash");
        assert_eq!(sanitize_name("with space"), "with_space");
    }
}
