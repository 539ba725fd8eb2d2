//! Sequence state and range types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Most digits a sequence field may carry.
pub const MAX_SEQUENCE_DIGITS: usize = 19;

/// Largest sequence value a counter may hand out (19 nines).
pub const MAX_SEQUENCE_VALUE: u64 = 9_999_999_999_999_999_999;

/// Counter key for the calendar day an identifier is generated on (`YYYYMMDD`).
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// A contiguous block of reserved sequence values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRange {
    /// First value in the range (inclusive).
    pub start: u64,
    /// Last value in the range (inclusive).
    pub end: u64,
}

impl SequenceRange {
    /// Create a new sequence range.
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Get the number of values in this range.
    #[must_use]
    pub const fn count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Check if the range is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl IntoIterator for SequenceRange {
    type Item = u64;
    type IntoIter = std::ops::RangeInclusive<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..=self.end
    }
}

/// Persisted state of one day counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceState {
    /// Counter key.
    pub key: String,

    /// Last value handed out (0 when none yet).
    pub current_value: u64,

    /// Number of writes, for diagnostics.
    pub version: u64,

    /// Last update timestamp (milliseconds since epoch).
    pub updated_at: i64,
}

impl SequenceState {
    /// Create a fresh counter.
    #[must_use]
    pub fn new(key: String) -> Self {
        Self {
            key,
            current_value: 0,
            version: 0,
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Reserve `count` values after the current one.
    ///
    /// Returns `None` when the counter would pass [`MAX_SEQUENCE_VALUE`].
    pub fn reserve(&mut self, count: u64) -> Option<SequenceRange> {
        let start = self.current_value.checked_add(1)?;
        let end = self
            .current_value
            .checked_add(count)
            .filter(|end| *end <= MAX_SEQUENCE_VALUE)?;
        self.current_value = end;
        self.version += 1;
        self.updated_at = chrono::Utc::now().timestamp_millis();
        Some(SequenceRange::new(start, end))
    }
}
