//! Write side: position mutations.

use async_trait::async_trait;
use lockvote_positions::{ActionKind, ActionTarget, PendingAction};
use lockvote_types::{Days, PositionIndex, TokenAmount, VoterId};

use crate::error::ProviderError;

#[async_trait]
pub trait PositionActions: Send + Sync {
    async fn start_unlock(&self, voter: &VoterId, index: PositionIndex)
        -> Result<(), ProviderError>;

    async fn partial_unlock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        amount: TokenAmount,
    ) -> Result<(), ProviderError>;

    /// `amount` is the relocked total; anything above the position's
    /// amount comes from the voter's balance.
    async fn relock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        period_days: Days,
        amount: TokenAmount,
    ) -> Result<(), ProviderError>;

    async fn extend_lock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        period_days: Days,
    ) -> Result<(), ProviderError>;

    async fn withdraw(&self, voter: &VoterId, index: PositionIndex) -> Result<(), ProviderError>;

    async fn withdraw_all(&self, voter: &VoterId) -> Result<(), ProviderError>;
}

/// Send a confirmed action to the mutation interface.
///
/// Target and kind are assumed to agree; a mismatched pair is rejected
/// without calling the provider.
pub async fn dispatch<A: PositionActions>(
    actions: &A,
    voter: &VoterId,
    pending: &PendingAction,
) -> Result<(), ProviderError> {
    tracing::debug!(voter = %voter, ?pending, "dispatching action");
    match (pending.target, &pending.kind) {
        (ActionTarget::AllWithdrawable, ActionKind::WithdrawAll) => actions.withdraw_all(voter).await,
        (ActionTarget::Position(index), ActionKind::StartUnlock) => {
            actions.start_unlock(voter, index).await
        }
        (ActionTarget::Position(index), ActionKind::PartialUnlock { amount }) => {
            actions.partial_unlock(voter, index, *amount).await
        }
        (
            ActionTarget::Position(index),
            ActionKind::Relock {
                period_days,
                amount,
            },
        ) => actions.relock(voter, index, *period_days, *amount).await,
        (ActionTarget::Position(index), ActionKind::ExtendLock { period_days }) => {
            actions.extend_lock(voter, index, *period_days).await
        }
        (ActionTarget::Position(index), ActionKind::Withdraw) => {
            actions.withdraw(voter, index).await
        }
        (ActionTarget::Position(_), ActionKind::WithdrawAll)
        | (ActionTarget::AllWithdrawable, _) => Err(ProviderError::Rejected(format!(
            "{} does not apply to {:?}",
            pending.kind.name(),
            pending.target
        ))),
    }
}
