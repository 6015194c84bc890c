//! Action eligibility and pending actions.
//!
//! Each position has exactly one primary action, picked by its state. Row
//! buttons do not capture closures: they produce a [`PendingAction`] value,
//! and the confirmation step validates that value against the latest summary
//! before anything is sent to the mutation interface.

use lockvote_types::{
    Days, LockDuration, LockingParams, PositionIndex, Timestamp, TokenAmount, VotingPower,
    ONE_TOKEN,
};
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::position::LockingPosition;
use crate::status::{resolve_status, PositionState, TimeRemaining};
use crate::summary::VoterSummary;
use crate::voting_power::calculate_voting_power;

/// The primary action offered for a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionAction {
    StartUnlock,
    /// Offered while unlocking: cancels the pending unlock and starts a new cycle.
    Relock,
    Withdraw,
}

impl PositionAction {
    pub fn for_state(state: PositionState) -> Self {
        match state {
            PositionState::Locked => Self::StartUnlock,
            PositionState::Unlocking => Self::Relock,
            PositionState::Unlocked => Self::Withdraw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StartUnlock => "Start unlock",
            Self::Relock => "Relock",
            Self::Withdraw => "Withdraw",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTarget {
    Position(PositionIndex),
    /// Every unlocked position at once.
    AllWithdrawable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    StartUnlock,
    /// Unlock only `amount`, leaving the rest locked.
    PartialUnlock { amount: TokenAmount },
    /// `amount` is the relocked total: the position's tokens plus any extra
    /// taken from the voter's balance. It can never shrink the position.
    Relock { period_days: Days, amount: TokenAmount },
    /// Lengthen the period of a locked position.
    ExtendLock { period_days: Days },
    Withdraw,
    WithdrawAll,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartUnlock => "unlock",
            Self::PartialUnlock { .. } => "partially unlock",
            Self::Relock { .. } => "relock",
            Self::ExtendLock { .. } => "extend",
            Self::Withdraw => "withdraw",
            Self::WithdrawAll => "withdraw all",
        }
    }
}

/// What an action would do if the ledger accepts it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPreview {
    /// Voting power of the resulting locked position.
    pub projected_voting_power: Option<VotingPower>,
    /// Tokens that leave the lock (withdrawn or sent to unlocking).
    pub released_amount: Option<TokenAmount>,
}

/// A user's requested action, awaiting confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub target: ActionTarget,
    pub kind: ActionKind,
}

impl PendingAction {
    pub fn start_unlock(index: PositionIndex) -> Self {
        Self {
            target: ActionTarget::Position(index),
            kind: ActionKind::StartUnlock,
        }
    }

    pub fn partial_unlock(index: PositionIndex, amount: TokenAmount) -> Self {
        Self {
            target: ActionTarget::Position(index),
            kind: ActionKind::PartialUnlock { amount },
        }
    }

    pub fn relock(index: PositionIndex, period_days: Days, amount: TokenAmount) -> Self {
        Self {
            target: ActionTarget::Position(index),
            kind: ActionKind::Relock {
                period_days,
                amount,
            },
        }
    }

    pub fn extend_lock(index: PositionIndex, period_days: Days) -> Self {
        Self {
            target: ActionTarget::Position(index),
            kind: ActionKind::ExtendLock { period_days },
        }
    }

    pub fn withdraw(index: PositionIndex) -> Self {
        Self {
            target: ActionTarget::Position(index),
            kind: ActionKind::Withdraw,
        }
    }

    pub fn withdraw_all() -> Self {
        Self {
            target: ActionTarget::AllWithdrawable,
            kind: ActionKind::WithdrawAll,
        }
    }

    /// The pending action for a position's primary button.
    ///
    /// Relock defaults to the position's current period and amount, which the
    /// user may change before confirming.
    pub fn primary_for(position: &LockingPosition, action: PositionAction) -> Self {
        match action {
            PositionAction::StartUnlock => Self::start_unlock(position.index),
            PositionAction::Relock => Self::relock(
                position.index,
                position.locking_period_days,
                position.amount,
            ),
            PositionAction::Withdraw => Self::withdraw(position.index),
        }
    }

    /// Check this action against `summary`, re-resolving the target at `now`.
    pub fn validate(
        &self,
        summary: &VoterSummary,
        params: &LockingParams,
        now: Timestamp,
    ) -> Result<ActionPreview, ActionError> {
        let index = match (self.target, &self.kind) {
            (ActionTarget::AllWithdrawable, ActionKind::WithdrawAll) => {
                return validate_withdraw_all(summary, now);
            }
            (ActionTarget::Position(index), kind) if *kind != ActionKind::WithdrawAll => index,
            _ => return Err(ActionError::TargetMismatch),
        };

        let position = &summary
            .position(index)
            .ok_or(ActionError::PositionNotFound(index))?
            .position;
        let status = resolve_status(position, now);
        let not_eligible = || ActionError::NotEligible {
            index,
            state: status.state,
            action: self.kind.name(),
        };

        match &self.kind {
            ActionKind::StartUnlock => {
                if status.state != PositionState::Locked {
                    return Err(not_eligible());
                }
                Ok(ActionPreview {
                    projected_voting_power: None,
                    released_amount: Some(position.amount),
                })
            }
            ActionKind::PartialUnlock { amount } => {
                if status.state != PositionState::Locked {
                    return Err(not_eligible());
                }
                validate_partial_unlock(position, *amount, params)
            }
            ActionKind::Relock {
                period_days,
                amount,
            } => {
                if status.state == PositionState::Locked {
                    return Err(not_eligible());
                }
                check_period(*period_days, params)?;
                if let TimeRemaining::Remaining(left) = status.time_remaining {
                    if left >= LockDuration::from_days(*period_days as u64) {
                        return Err(ActionError::RelockPeriodTooShort {
                            days: *period_days,
                            remaining_days: left.whole_days(),
                        });
                    }
                }
                check_amount(*amount, params)?;
                if *amount < position.amount {
                    return Err(ActionError::RelockBelowPosition {
                        amount: *amount,
                        current: position.amount,
                    });
                }
                Ok(ActionPreview {
                    projected_voting_power: Some(calculate_voting_power(
                        *amount,
                        *period_days,
                        params,
                    )?),
                    released_amount: None,
                })
            }
            ActionKind::ExtendLock { period_days } => {
                if status.state != PositionState::Locked {
                    return Err(not_eligible());
                }
                if *period_days <= position.locking_period_days {
                    return Err(ActionError::PeriodNotLonger {
                        days: *period_days,
                        current: position.locking_period_days,
                    });
                }
                check_period(*period_days, params)?;
                Ok(ActionPreview {
                    projected_voting_power: Some(calculate_voting_power(
                        position.amount,
                        *period_days,
                        params,
                    )?),
                    released_amount: None,
                })
            }
            ActionKind::Withdraw => {
                if status.state != PositionState::Unlocked {
                    return Err(not_eligible());
                }
                Ok(ActionPreview {
                    projected_voting_power: None,
                    released_amount: Some(position.amount),
                })
            }
            ActionKind::WithdrawAll => Err(ActionError::TargetMismatch),
        }
    }
}

fn validate_withdraw_all(summary: &VoterSummary, now: Timestamp) -> Result<ActionPreview, ActionError> {
    let total: TokenAmount = summary
        .locking_positions()
        .filter(|p| resolve_status(p, now).state == PositionState::Unlocked)
        .map(|p| p.amount)
        .sum();
    if total.is_zero() {
        return Err(ActionError::NothingToWithdraw);
    }
    Ok(ActionPreview {
        projected_voting_power: None,
        released_amount: Some(total),
    })
}

fn validate_partial_unlock(
    position: &LockingPosition,
    amount: TokenAmount,
    params: &LockingParams,
) -> Result<ActionPreview, ActionError> {
    if amount.is_zero() {
        return Err(ActionError::ZeroAmount);
    }
    let one_token = TokenAmount::new(ONE_TOKEN);
    if amount < one_token {
        return Err(ActionError::AmountBelowMinimum {
            amount,
            min: one_token,
        });
    }
    let remainder = position
        .amount
        .checked_sub(amount)
        .ok_or(ActionError::AmountExceedsPosition {
            amount,
            available: position.amount,
        })?;
    // Unlocking everything is a plain unlock.
    if remainder.is_zero() {
        return Ok(ActionPreview {
            projected_voting_power: None,
            released_amount: Some(amount),
        });
    }
    if remainder < params.min_deposit_amount {
        return Err(ActionError::AmountBelowMinimum {
            amount: remainder,
            min: params.min_deposit_amount,
        });
    }
    Ok(ActionPreview {
        projected_voting_power: Some(calculate_voting_power(
            remainder,
            position.locking_period_days,
            params,
        )?),
        released_amount: Some(amount),
    })
}

fn check_period(days: Days, params: &LockingParams) -> Result<(), ActionError> {
    if params.accepts_period(days) {
        Ok(())
    } else {
        Err(ActionError::PeriodOutOfRange {
            days,
            min: params.min_locking_days,
            max: params.max_locking_days,
        })
    }
}

fn check_amount(amount: TokenAmount, params: &LockingParams) -> Result<(), ActionError> {
    if amount.is_zero() {
        return Err(ActionError::ZeroAmount);
    }
    if amount < params.min_deposit_amount {
        return Err(ActionError::AmountBelowMinimum {
            amount,
            min: params.min_deposit_amount,
        });
    }
    Ok(())
}
