//! Lock-position lifecycle engine.
//!
//! A locking position moves Locked → Unlocking → Unlocked, then is either
//! withdrawn (removed) or relocked (back to Locked). Everything here is a pure
//! function of a fetched snapshot and the current time:
//! - [`resolve_status`] classifies one position and computes its countdown
//! - [`aggregate`] folds a voter's positions into a [`VoterSummary`]
//! - [`PendingAction::validate`] re-checks a requested action before it is sent
//!
//! Nothing in this crate mutates a position. State changes happen through the
//! external mutation interface followed by a refetch.

pub mod actions;
pub mod error;
pub mod position;
pub mod status;
pub mod summary;
pub mod voting_power;

pub use actions::{ActionKind, ActionPreview, ActionTarget, PendingAction, PositionAction};
pub use error::{ActionError, PositionError};
pub use position::{LockingPosition, RawLockingPosition, UnlockStart};
pub use status::{describe_remaining_time, resolve_status, PositionState, PositionStatus, TimeRemaining};
pub use summary::{
    aggregate, BalanceDiscrepancy, BalanceKind, ResolvedPosition, SkippedEntry, StandaloneBalances,
    VoterSummary,
};
pub use voting_power::calculate_voting_power;
