//! Position status resolution.
//!
//! The state of a position is derived, never stored: it depends only on whether
//! unlocking has started and on how `now` compares with
//! `unlocking_started_at + locking_period`. The boundary instant itself counts
//! as unlocked.

use lockvote_types::{LockDuration, Timestamp};
use lockvote_utils::{format_days, format_remaining};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::LockingPosition;

/// Lifecycle state of a locking position. Exactly one holds at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionState {
    /// Unlocking has not started; the position contributes voting power.
    Locked,
    /// Unlocking started and the cooldown has not elapsed yet.
    Unlocking,
    /// Cooldown elapsed; tokens can be withdrawn or relocked.
    Unlocked,
}

impl PositionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Unlocking => "Unlocking...",
            Self::Unlocked => "Unlocked",
        }
    }
}

/// Time left until a position's next automatic transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRemaining {
    /// Locked positions have no countdown.
    NotApplicable,
    /// Unlocking positions count down to withdrawability.
    Remaining(LockDuration),
    /// Unlocked positions have nothing left to wait for.
    Elapsed,
}

impl TimeRemaining {
    /// The countdown as a duration; zero for the sentinels.
    pub fn as_duration(&self) -> LockDuration {
        match self {
            Self::Remaining(d) => *d,
            Self::NotApplicable | Self::Elapsed => LockDuration::ZERO,
        }
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => f.write_str("—"),
            Self::Remaining(d) => f.write_str(&format_remaining(*d)),
            Self::Elapsed => f.write_str(&format_days(0)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStatus {
    pub state: PositionState,
    pub time_remaining: TimeRemaining,
}

/// Classify `position` at instant `now`.
///
/// Total over its domain: a zero locking period or an unlock start in the
/// future (clock skew) still classifies by the inequality, and the countdown
/// is clamped so it never goes below zero.
pub fn resolve_status(position: &LockingPosition, now: Timestamp) -> PositionStatus {
    let Some(started) = position.unlocking_started_at else {
        return PositionStatus {
            state: PositionState::Locked,
            time_remaining: TimeRemaining::NotApplicable,
        };
    };

    if started > now {
        tracing::trace!(
            index = position.index,
            started = started.as_millis(),
            now = now.as_millis(),
            "unlock start is ahead of the local clock"
        );
    }

    if started.has_elapsed(position.locking_period(), now) {
        PositionStatus {
            state: PositionState::Unlocked,
            time_remaining: TimeRemaining::Elapsed,
        }
    } else {
        let ends_at = started.saturating_add(position.locking_period());
        PositionStatus {
            state: PositionState::Unlocking,
            time_remaining: TimeRemaining::Remaining(now.saturating_duration_until(ends_at)),
        }
    }
}

/// Human-readable countdown for one position: "—", "0 days", "<1 hour" or e.g. "15 days".
pub fn describe_remaining_time(position: &LockingPosition, now: Timestamp) -> String {
    resolve_status(position, now).time_remaining.to_string()
}
