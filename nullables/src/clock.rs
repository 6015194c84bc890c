//! Nullable clock: deterministic time for testing.

use lockvote_types::{LockDuration, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_millis: u64) -> Self {
        Self {
            current: Cell::new(initial_millis),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a duration.
    pub fn advance(&self, by: LockDuration) {
        self.current
            .set(self.current.get().saturating_add(by.as_millis()));
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(LockDuration::from_days(days));
    }

    /// Set the time to a specific value.
    pub fn set(&self, millis: u64) {
        self.current.set(millis);
    }
}
