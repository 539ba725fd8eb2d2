//! Time source for identifier dates.
//!
//! Identifiers are display values, so the wall-clock date of the process is
//! used by default. Tests substitute a [`FixedClock`].

use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;
use serde::Deserialize;

/// Provides the current date and time in the generator's time reference.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Which wall clock identifiers are dated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeReference {
    /// Process-local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    reference: TimeReference,
}

impl SystemClock {
    /// Create a system clock for the given time reference.
    #[must_use]
    pub const fn new(reference: TimeReference) -> Self {
        Self { reference }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.reference {
            TimeReference::Local => chrono::Local::now().naive_local(),
            TimeReference::Utc => chrono::Utc::now().naive_utc(),
        }
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
