//! Timestamp and duration types used throughout lockvote.
//!
//! Timestamps are Unix epoch milliseconds (UTC), matching the ledger's
//! `unlocking_started_at` field. Durations are plain integer milliseconds;
//! lifecycle boundaries are compared exactly, with no calendar arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;
pub const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// A Unix timestamp in milliseconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().min(u64::MAX as u128) as u64)
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `duration`, pinned at `u64::MAX`.
    pub fn saturating_add(self, duration: LockDuration) -> Self {
        Self(self.0.saturating_add(duration.as_millis()))
    }

    /// Time left from `self` until `later`; zero when `later` is not after `self`.
    pub fn saturating_duration_until(&self, later: Timestamp) -> LockDuration {
        LockDuration(later.0.saturating_sub(self.0))
    }

    /// Whether this timestamp + duration has been reached relative to `now`.
    pub fn has_elapsed(&self, duration: LockDuration, now: Timestamp) -> bool {
        now >= self.saturating_add(duration)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A non-negative span of time in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LockDuration(u64);

impl LockDuration {
    pub const ZERO: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn from_hours(hours: u64) -> Self {
        Self(hours.saturating_mul(MILLIS_PER_HOUR))
    }

    pub fn from_days(days: u64) -> Self {
        Self(days.saturating_mul(MILLIS_PER_DAY))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Complete days contained in this duration (rounded down).
    pub fn whole_days(&self) -> u64 {
        self.0 / MILLIS_PER_DAY
    }

    /// Complete hours left over after removing whole days.
    pub fn remainder_hours(&self) -> u64 {
        (self.0 % MILLIS_PER_DAY) / MILLIS_PER_HOUR
    }

    /// Complete hours contained in this duration (rounded down).
    pub fn whole_hours(&self) -> u64 {
        self.0 / MILLIS_PER_HOUR
    }
}

impl fmt::Display for LockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h", self.whole_days(), self.remainder_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_convert_exactly() {
        assert_eq!(LockDuration::from_days(1).as_millis(), 86_400_000);
        assert_eq!(LockDuration::from_days(30).whole_days(), 30);
    }

    #[test]
    fn elapsed_boundary_is_inclusive() {
        let start = Timestamp::new(1_000);
        let period = LockDuration::from_millis(500);
        assert!(!start.has_elapsed(period, Timestamp::new(1_499)));
        assert!(start.has_elapsed(period, Timestamp::new(1_500)));
    }

    #[test]
    fn duration_until_never_goes_negative() {
        let now = Timestamp::new(10_000);
        assert_eq!(now.saturating_duration_until(Timestamp::new(5_000)), LockDuration::ZERO);
        assert_eq!(
            now.saturating_duration_until(Timestamp::new(12_500)),
            LockDuration::from_millis(2_500)
        );
    }

    #[test]
    fn remainder_hours_drops_whole_days() {
        let d = LockDuration::from_days(2).as_millis() + 5 * MILLIS_PER_HOUR + 59_000;
        let d = LockDuration::from_millis(d);
        assert_eq!(d.whole_days(), 2);
        assert_eq!(d.remainder_hours(), 5);
        assert_eq!(d.whole_hours(), 53);
    }

    #[test]
    fn add_saturates_at_max() {
        let t = Timestamp::new(u64::MAX - 1);
        assert_eq!(t.saturating_add(LockDuration::from_days(1)).as_millis(), u64::MAX);
    }
}
