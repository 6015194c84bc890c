//! Nullable provider: an in-memory ledger of locking positions.
//!
//! Fetches return whatever was configured. Mutations are applied to the
//! in-memory positions at the provider's own ledger time, so a refetch after
//! an action sees its effect the way a real ledger would. Every accepted
//! action is recorded for later assertions.

use async_trait::async_trait;
use lockvote_positions::{
    calculate_voting_power, resolve_status, LockingPosition, PendingAction, PositionState,
    PositionStatus, RawLockingPosition, StandaloneBalances, TimeRemaining, UnlockStart,
};
use lockvote_provider::{PositionActions, ProviderError, VoterDataProvider};
use lockvote_types::{
    Days, LockDuration, LockingParams, PositionIndex, Timestamp, TokenAmount, VoterId, VotingPower,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One action the provider accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedAction {
    pub voter: VoterId,
    pub action: PendingAction,
}

#[derive(Clone, Debug, Default)]
struct VoterLedger {
    positions: Vec<RawLockingPosition>,
    balances: StandaloneBalances,
}

impl VoterLedger {
    fn find(&mut self, index: PositionIndex) -> Result<&mut RawLockingPosition, ProviderError> {
        self.positions
            .iter_mut()
            .find(|p| p.index == Some(index))
            .ok_or_else(|| ProviderError::Rejected(format!("position {index} not found")))
    }

    fn next_index(&self) -> PositionIndex {
        self.positions
            .iter()
            .filter_map(|p| p.index)
            .max()
            .map_or(0, |i| i + 1)
    }

    fn remove_power(&mut self, power: VotingPower) {
        self.balances.voting_power_available =
            self.balances.voting_power_available.saturating_sub(power);
    }

    fn add_power(&mut self, power: VotingPower) {
        self.balances.voting_power_available =
            self.balances.voting_power_available.saturating_add(power);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn status_at(raw: &RawLockingPosition, now: Timestamp) -> Result<PositionStatus, ProviderError> {
    let position =
        LockingPosition::try_from(raw).map_err(|e| ProviderError::Rejected(e.to_string()))?;
    Ok(resolve_status(&position, now))
}

fn state_at(raw: &RawLockingPosition, now: Timestamp) -> Result<PositionState, ProviderError> {
    Ok(status_at(raw, now)?.state)
}

fn require_state(
    raw: &RawLockingPosition,
    now: Timestamp,
    allowed: &[PositionState],
) -> Result<(), ProviderError> {
    let state = state_at(raw, now)?;
    if allowed.contains(&state) {
        Ok(())
    } else {
        Err(ProviderError::Rejected(format!(
            "position is {}",
            state.label()
        )))
    }
}

fn power_for(
    amount: TokenAmount,
    days: Days,
    params: &LockingParams,
) -> Result<VotingPower, ProviderError> {
    calculate_voting_power(amount, days, params).map_err(|e| ProviderError::Rejected(e.to_string()))
}

/// An in-memory voter data-and-action provider for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullProvider {
    params: LockingParams,
    ledger_time: AtomicU64,
    voters: Mutex<HashMap<VoterId, VoterLedger>>,
    actions: Mutex<Vec<RecordedAction>>,
    next_failure: Mutex<Option<ProviderError>>,
    fetches: AtomicUsize,
}

impl NullProvider {
    pub fn new(params: LockingParams) -> Self {
        Self {
            params,
            ledger_time: AtomicU64::new(0),
            voters: Mutex::new(HashMap::new()),
            actions: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace a voter's positions and balances.
    pub fn set_voter(
        &self,
        voter: &VoterId,
        positions: Vec<RawLockingPosition>,
        balances: StandaloneBalances,
    ) {
        lock(&self.voters).insert(
            voter.clone(),
            VoterLedger {
                positions,
                balances,
            },
        );
    }

    /// Add a locked position with voting power from the configured formula.
    pub fn add_locked(
        &self,
        voter: &VoterId,
        amount: TokenAmount,
        days: Days,
    ) -> Result<PositionIndex, ProviderError> {
        let power = power_for(amount, days, &self.params)?;
        let mut voters = lock(&self.voters);
        let ledger = voters.entry(voter.clone()).or_default();
        let index = ledger.next_index();
        ledger.positions.push(RawLockingPosition {
            index: Some(index),
            amount: Some(amount),
            voting_power: Some(power),
            locking_period: Some(days),
            unlocking_started_at: None,
        });
        ledger.add_power(power);
        Ok(index)
    }

    /// The time mutations are applied at.
    pub fn set_ledger_time(&self, now: Timestamp) {
        self.ledger_time.store(now.as_millis(), Ordering::SeqCst);
    }

    pub fn ledger_time(&self) -> Timestamp {
        Timestamp::new(self.ledger_time.load(Ordering::SeqCst))
    }

    /// Make the next call (fetch or action) fail with `error`.
    pub fn fail_next(&self, error: ProviderError) {
        *lock(&self.next_failure) = Some(error);
    }

    pub fn recorded_actions(&self) -> Vec<RecordedAction> {
        lock(&self.actions).clone()
    }

    /// How many position fetches have been served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn positions(&self, voter: &VoterId) -> Vec<RawLockingPosition> {
        lock(&self.voters)
            .get(voter)
            .map(|l| l.positions.clone())
            .unwrap_or_default()
    }

    fn take_failure(&self) -> Result<(), ProviderError> {
        match lock(&self.next_failure).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn with_ledger<T>(
        &self,
        voter: &VoterId,
        f: impl FnOnce(&VoterLedger) -> T,
    ) -> Result<T, ProviderError> {
        self.take_failure()?;
        let voters = lock(&self.voters);
        let ledger = voters
            .get(voter)
            .ok_or_else(|| ProviderError::VoterNotFound(voter.to_string()))?;
        Ok(f(ledger))
    }

    fn mutate(
        &self,
        voter: &VoterId,
        action: PendingAction,
        f: impl FnOnce(&mut VoterLedger, Timestamp, &LockingParams) -> Result<(), ProviderError>,
    ) -> Result<(), ProviderError> {
        self.take_failure()?;
        let now = self.ledger_time();
        {
            let mut voters = lock(&self.voters);
            let ledger = voters
                .get_mut(voter)
                .ok_or_else(|| ProviderError::VoterNotFound(voter.to_string()))?;
            f(ledger, now, &self.params)?;
        }
        tracing::debug!(voter = %voter, kind = action.kind.name(), "null provider applied action");
        lock(&self.actions).push(RecordedAction {
            voter: voter.clone(),
            action,
        });
        Ok(())
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new(LockingParams::default())
    }
}

#[async_trait]
impl VoterDataProvider for NullProvider {
    async fn fetch_positions(
        &self,
        voter: &VoterId,
    ) -> Result<Vec<RawLockingPosition>, ProviderError> {
        let positions = self.with_ledger(voter, |l| l.positions.clone())?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(positions)
    }

    async fn fetch_standalone_balances(
        &self,
        voter: &VoterId,
    ) -> Result<StandaloneBalances, ProviderError> {
        self.with_ledger(voter, |l| l.balances.clone())
    }
}

#[async_trait]
impl PositionActions for NullProvider {
    async fn start_unlock(&self, voter: &VoterId, index: PositionIndex) -> Result<(), ProviderError> {
        self.mutate(voter, PendingAction::start_unlock(index), |ledger, now, _| {
            let position = ledger.find(index)?;
            require_state(position, now, &[PositionState::Locked])?;
            let power = position
                .voting_power
                .replace(VotingPower::ZERO)
                .unwrap_or_default();
            position.unlocking_started_at = Some(UnlockStart::At(now.as_millis()));
            ledger.remove_power(power);
            Ok(())
        })
    }

    async fn partial_unlock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        amount: TokenAmount,
    ) -> Result<(), ProviderError> {
        self.mutate(
            voter,
            PendingAction::partial_unlock(index, amount),
            |ledger, now, params| {
                let next = ledger.next_index();
                let position = ledger.find(index)?;
                require_state(position, now, &[PositionState::Locked])?;
                let current = position.amount.unwrap_or_default();
                let remaining = current
                    .checked_sub(amount)
                    .ok_or_else(|| ProviderError::Rejected("amount exceeds position".into()))?;
                let days = position.locking_period.unwrap_or_default();
                let old_power = position.voting_power.unwrap_or_default();
                let new_power = power_for(remaining, days, params)?;
                position.amount = Some(remaining);
                position.voting_power = Some(new_power);
                ledger.positions.push(RawLockingPosition {
                    index: Some(next),
                    amount: Some(amount),
                    voting_power: Some(VotingPower::ZERO),
                    locking_period: Some(days),
                    unlocking_started_at: Some(UnlockStart::At(now.as_millis())),
                });
                ledger.remove_power(old_power);
                ledger.add_power(new_power);
                Ok(())
            },
        )
    }

    async fn relock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        period_days: Days,
        amount: TokenAmount,
    ) -> Result<(), ProviderError> {
        self.mutate(
            voter,
            PendingAction::relock(index, period_days, amount),
            |ledger, now, params| {
                let position = ledger.find(index)?;
                require_state(
                    position,
                    now,
                    &[PositionState::Unlocking, PositionState::Unlocked],
                )?;
                if let TimeRemaining::Remaining(left) = status_at(position, now)?.time_remaining {
                    if left >= LockDuration::from_days(period_days as u64) {
                        return Err(ProviderError::Rejected(format!(
                            "new locking period must be longer than {} days",
                            left.whole_days()
                        )));
                    }
                }
                let current = position.amount.unwrap_or_default();
                if amount < current {
                    return Err(ProviderError::Rejected(format!(
                        "relock amount {amount} is below the position amount {current}"
                    )));
                }
                let power = power_for(amount, period_days, params)?;
                position.amount = Some(amount);
                position.locking_period = Some(period_days);
                position.voting_power = Some(power);
                position.unlocking_started_at = None;
                ledger.add_power(power);
                Ok(())
            },
        )
    }

    async fn extend_lock(
        &self,
        voter: &VoterId,
        index: PositionIndex,
        period_days: Days,
    ) -> Result<(), ProviderError> {
        self.mutate(
            voter,
            PendingAction::extend_lock(index, period_days),
            |ledger, now, params| {
                let position = ledger.find(index)?;
                require_state(position, now, &[PositionState::Locked])?;
                let old_power = position.voting_power.unwrap_or_default();
                let new_power =
                    power_for(position.amount.unwrap_or_default(), period_days, params)?;
                position.locking_period = Some(period_days);
                position.voting_power = Some(new_power);
                ledger.remove_power(old_power);
                ledger.add_power(new_power);
                Ok(())
            },
        )
    }

    async fn withdraw(&self, voter: &VoterId, index: PositionIndex) -> Result<(), ProviderError> {
        self.mutate(voter, PendingAction::withdraw(index), |ledger, now, _| {
            let position = ledger.find(index)?;
            require_state(position, now, &[PositionState::Unlocked])?;
            ledger.positions.retain(|p| p.index != Some(index));
            Ok(())
        })
    }

    async fn withdraw_all(&self, voter: &VoterId) -> Result<(), ProviderError> {
        self.mutate(voter, PendingAction::withdraw_all(), |ledger, now, _| {
            let before = ledger.positions.len();
            ledger
                .positions
                .retain(|p| !matches!(state_at(p, now), Ok(PositionState::Unlocked)));
            if ledger.positions.len() == before {
                return Err(ProviderError::Rejected("nothing to withdraw".into()));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockvote_types::{MILLIS_PER_DAY, ONE_TOKEN};

    const START: u64 = 1_760_000_000_000;

    fn alice() -> VoterId {
        VoterId::new("alice.near").unwrap()
    }

    fn provider_at_start() -> NullProvider {
        let provider = NullProvider::default();
        provider.set_ledger_time(Timestamp::new(START));
        provider
    }

    #[tokio::test]
    async fn unknown_voter_is_not_found() {
        let provider = NullProvider::default();
        let result = provider.fetch_positions(&alice()).await;
        assert!(matches!(result, Err(ProviderError::VoterNotFound(_))));
    }

    #[tokio::test]
    async fn start_unlock_moves_power_out() {
        let provider = provider_at_start();
        let index = provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 60)
            .unwrap();
        provider.start_unlock(&alice(), index).await.unwrap();

        let positions = provider.fetch_positions(&alice()).await.unwrap();
        assert_eq!(positions[0].unlocking_started_at, Some(UnlockStart::At(START)));
        assert_eq!(positions[0].voting_power, Some(VotingPower::ZERO));
        let balances = provider.fetch_standalone_balances(&alice()).await.unwrap();
        assert_eq!(balances.voting_power_available, VotingPower::ZERO);
        assert_eq!(provider.recorded_actions().len(), 1);
    }

    #[tokio::test]
    async fn withdraw_requires_elapsed_unlock() {
        let provider = provider_at_start();
        let index = provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 30)
            .unwrap();
        provider.start_unlock(&alice(), index).await.unwrap();
        assert!(matches!(
            provider.withdraw(&alice(), index).await,
            Err(ProviderError::Rejected(_))
        ));

        provider.set_ledger_time(Timestamp::new(START + 30 * MILLIS_PER_DAY));
        provider.withdraw(&alice(), index).await.unwrap();
        assert!(provider.positions(&alice()).is_empty());
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let provider = NullProvider::default();
        provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 60)
            .unwrap();
        provider.fail_next(ProviderError::Unavailable("down".into()));
        assert!(provider.fetch_positions(&alice()).await.is_err());
        assert!(provider.fetch_positions(&alice()).await.is_ok());
        assert_eq!(provider.fetch_count(), 1);
    }

    #[tokio::test]
    async fn partial_unlock_splits_the_position() {
        let provider = provider_at_start();
        let index = provider
            .add_locked(&alice(), TokenAmount::new(3 * ONE_TOKEN), 60)
            .unwrap();
        provider
            .partial_unlock(&alice(), index, TokenAmount::new(ONE_TOKEN))
            .await
            .unwrap();
        let positions = provider.positions(&alice());
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].amount, Some(TokenAmount::new(2 * ONE_TOKEN)));
        assert_eq!(positions[1].index, Some(1));
        assert_eq!(positions[1].unlocking_started_at, Some(UnlockStart::At(START)));
    }

    #[tokio::test]
    async fn relock_mirrors_ledger_rules() {
        let provider = provider_at_start();
        let index = provider
            .add_locked(&alice(), TokenAmount::new(5 * ONE_TOKEN), 60)
            .unwrap();
        provider.start_unlock(&alice(), index).await.unwrap();
        provider.set_ledger_time(Timestamp::new(START + 20 * MILLIS_PER_DAY));

        // 40 days still to go: 40 is not longer.
        assert!(matches!(
            provider
                .relock(&alice(), index, 40, TokenAmount::new(5 * ONE_TOKEN))
                .await,
            Err(ProviderError::Rejected(_))
        ));
        // Shrinking the position is refused.
        assert!(matches!(
            provider
                .relock(&alice(), index, 60, TokenAmount::new(ONE_TOKEN))
                .await,
            Err(ProviderError::Rejected(_))
        ));
        assert_eq!(provider.recorded_actions().len(), 1);

        provider
            .relock(&alice(), index, 41, TokenAmount::new(6 * ONE_TOKEN))
            .await
            .unwrap();
        let positions = provider.positions(&alice());
        assert_eq!(positions[0].amount, Some(TokenAmount::new(6 * ONE_TOKEN)));
        assert_eq!(positions[0].locking_period, Some(41));
        assert_eq!(positions[0].unlocking_started_at, None);
    }
}
