use lockvote_types::{Days, LockvoteError, PositionIndex, TokenAmount};
use thiserror::Error;

use crate::status::PositionState;

/// Why a fetched position entry was left out of a summary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("position entry is missing or has an invalid `{0}` field")]
    MalformedField(&'static str),

    #[error("position index {0} appears more than once in the snapshot")]
    DuplicateIndex(PositionIndex),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("position {0} not found")]
    PositionNotFound(PositionIndex),

    #[error("cannot {action} position {index} while it is {state:?}")]
    NotEligible {
        index: PositionIndex,
        state: PositionState,
        action: &'static str,
    },

    #[error("action does not apply to this target")]
    TargetMismatch,

    #[error("locking period {days} days is outside [{min}, {max}]")]
    PeriodOutOfRange { days: Days, min: Days, max: Days },

    #[error("new locking period {days} days must be longer than the current {current} days")]
    PeriodNotLonger { days: Days, current: Days },

    #[error("new locking period {days} days must be longer than the {remaining_days} days left unlocking")]
    RelockPeriodTooShort { days: Days, remaining_days: u64 },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("amount {amount} is below the minimum of {min}")]
    AmountBelowMinimum { amount: TokenAmount, min: TokenAmount },

    #[error("amount {amount} exceeds the position amount {available}")]
    AmountExceedsPosition {
        amount: TokenAmount,
        available: TokenAmount,
    },

    #[error("relock amount {amount} is below the position amount {current}")]
    RelockBelowPosition {
        amount: TokenAmount,
        current: TokenAmount,
    },

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error(transparent)]
    Params(#[from] LockvoteError),
}
