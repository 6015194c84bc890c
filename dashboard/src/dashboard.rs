//! The dashboard: latest snapshot plus the action confirmation flow.

use lockvote_positions::{
    aggregate, resolve_status, ActionPreview, ActionTarget, PendingAction, PositionState,
    VoterSummary,
};
use lockvote_provider::{dispatch, PositionActions, VoterDataProvider};
use lockvote_types::{LockingParams, PositionIndex, Timestamp, TokenAmount, VoterId, VotingPower};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::error::DashboardError;
use crate::row::PositionRow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub voting_power_available: VotingPower,
    pub voting_power_in_use: VotingPower,
    pub voting_power_free: VotingPower,
    pub locked: TokenAmount,
    pub unlocking: TokenAmount,
    pub to_withdraw: TokenAmount,
    pub locked_voting_power: VotingPower,
}

/// Everything rendered from one fetch. Never mutated after it is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Fetch generation; a snapshot only replaces an older one.
    pub generation: u64,
    pub evaluated_at: Timestamp,
    pub totals: DashboardTotals,
    pub rows: Vec<PositionRow>,
    pub withdraw_all_enabled: bool,
    pub can_open_position: bool,
    pub skipped_entries: usize,
    /// Human-readable data-quality warnings (balance mismatches, over-allocation).
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub summary: VoterSummary,
}

impl DashboardSnapshot {
    pub fn build(generation: u64, summary: VoterSummary, params: &LockingParams) -> Self {
        let rows = summary
            .positions
            .iter()
            .map(|resolved| PositionRow::build(resolved, &summary, params))
            .collect();

        let mut warnings: Vec<String> = summary
            .discrepancies
            .iter()
            .map(|d| {
                format!(
                    "{:?} total reported as {} but positions add up to {}",
                    d.kind, d.reported, d.derived
                )
            })
            .collect();
        if !summary.is_consistent() {
            warnings.push(format!(
                "voting power in use ({}) exceeds available ({})",
                summary.voting_power_in_use, summary.voting_power_available
            ));
        }

        Self {
            generation,
            evaluated_at: summary.evaluated_at,
            totals: DashboardTotals {
                voting_power_available: summary.voting_power_available,
                voting_power_in_use: summary.voting_power_in_use,
                voting_power_free: summary.voting_power_free(),
                locked: summary.locked,
                unlocking: summary.unlocking,
                to_withdraw: summary.to_withdraw,
                locked_voting_power: summary.locked_voting_power,
            },
            rows,
            withdraw_all_enabled: summary.withdraw_all_enabled(),
            can_open_position: summary.can_open_position(params),
            skipped_entries: summary.skipped.len(),
            warnings,
            summary,
        }
    }

    pub fn row(&self, index: PositionIndex) -> Option<&PositionRow> {
        self.rows.iter().find(|r| r.index == index)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Targets an action keeps busy while it is dispatched.
///
/// Withdraw-all also occupies every position it would clear at `now`.
fn occupied_targets(
    pending: &PendingAction,
    summary: &VoterSummary,
    now: Timestamp,
) -> Vec<ActionTarget> {
    let mut targets = vec![pending.target];
    if pending.target == ActionTarget::AllWithdrawable {
        targets.extend(
            summary
                .positions
                .iter()
                .filter(|p| resolve_status(&p.position, now).state == PositionState::Unlocked)
                .map(|p| ActionTarget::Position(p.position.index)),
        );
    }
    targets
}

/// Marks a set of targets busy for as long as it lives.
struct InFlight<'a> {
    busy: &'a Mutex<HashSet<ActionTarget>>,
    targets: Vec<ActionTarget>,
}

impl<'a> InFlight<'a> {
    /// Claims all of `targets` or none of them.
    fn acquire(
        busy: &'a Mutex<HashSet<ActionTarget>>,
        targets: Vec<ActionTarget>,
    ) -> Result<Self, DashboardError> {
        let mut set = lock(busy);
        if let Some(&taken) = targets.iter().find(|t| set.contains(*t)) {
            return Err(DashboardError::ActionInFlight(taken));
        }
        set.extend(targets.iter().copied());
        drop(set);
        Ok(Self { busy, targets })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = lock(self.busy);
        for target in &self.targets {
            set.remove(target);
        }
    }
}

/// Presentation boundary for one voter.
///
/// Holds the latest snapshot behind a lock that is only taken to swap or
/// clone an `Arc`, never across an await.
pub struct Dashboard<P> {
    provider: P,
    voter: VoterId,
    params: LockingParams,
    current: RwLock<Option<Arc<DashboardSnapshot>>>,
    generation: AtomicU64,
    in_flight: Mutex<HashSet<ActionTarget>>,
}

impl<P> Dashboard<P>
where
    P: VoterDataProvider + PositionActions,
{
    pub fn new(provider: P, voter: VoterId, params: LockingParams) -> Self {
        Self {
            provider,
            voter,
            params,
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn voter(&self) -> &VoterId {
        &self.voter
    }

    pub fn params(&self) -> &LockingParams {
        &self.params
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The latest rendered snapshot, if any fetch has completed.
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_in_flight(&self, target: ActionTarget) -> bool {
        lock(&self.in_flight).contains(&target)
    }

    /// Fetch, aggregate and publish a new snapshot.
    ///
    /// When a later refresh finished first, its snapshot is kept and returned
    /// instead of this one.
    pub async fn refresh(&self, now: Timestamp) -> Result<Arc<DashboardSnapshot>, DashboardError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let positions = self.provider.fetch_positions(&self.voter).await?;
        let balances = self.provider.fetch_standalone_balances(&self.voter).await?;
        let summary = aggregate(&positions, &balances, now);
        let snapshot = Arc::new(DashboardSnapshot::build(generation, summary, &self.params));

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = current.as_ref() {
            if existing.generation > generation {
                tracing::debug!(
                    generation,
                    newer = existing.generation,
                    "discarding stale snapshot"
                );
                return Ok(Arc::clone(existing));
            }
        }
        *current = Some(Arc::clone(&snapshot));
        drop(current);

        tracing::info!(
            voter = %self.voter,
            generation,
            positions = snapshot.rows.len(),
            skipped = snapshot.skipped_entries,
            locked = %snapshot.totals.locked,
            unlocking = %snapshot.totals.unlocking,
            to_withdraw = %snapshot.totals.to_withdraw,
            "dashboard refreshed"
        );
        Ok(snapshot)
    }

    /// Validate `pending` against the latest snapshot without sending it.
    pub fn preview(
        &self,
        pending: &PendingAction,
        now: Timestamp,
    ) -> Result<ActionPreview, DashboardError> {
        let snapshot = self.current().ok_or(DashboardError::NotLoaded)?;
        Ok(pending.validate(&snapshot.summary, &self.params, now)?)
    }

    /// Run a confirmed action: validate, dispatch, then refetch.
    ///
    /// A second confirm touching a target that is still being dispatched
    /// fails with [`DashboardError::ActionInFlight`]; withdraw-all overlaps
    /// every position it clears. On provider failure the current snapshot is
    /// left as it was.
    pub async fn confirm(
        &self,
        pending: &PendingAction,
        now: Timestamp,
    ) -> Result<Arc<DashboardSnapshot>, DashboardError> {
        let snapshot = self.current().ok_or(DashboardError::NotLoaded)?;
        let preview = pending.validate(&snapshot.summary, &self.params, now)?;
        let guard = InFlight::acquire(
            &self.in_flight,
            occupied_targets(pending, &snapshot.summary, now),
        )?;
        tracing::info!(
            voter = %self.voter,
            action = pending.kind.name(),
            target = ?pending.target,
            ?preview,
            "dispatching confirmed action"
        );

        if let Err(e) = dispatch(&self.provider, &self.voter, pending).await {
            tracing::warn!(
                voter = %self.voter,
                action = pending.kind.name(),
                error = %e,
                "action failed"
            );
            return Err(e.into());
        }
        drop(guard);

        self.refresh(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockvote_nullables::NullProvider;
    use lockvote_types::ONE_TOKEN;

    fn alice() -> VoterId {
        VoterId::new("alice.near").unwrap()
    }

    #[tokio::test]
    async fn preview_needs_a_snapshot() {
        let dashboard = Dashboard::new(NullProvider::default(), alice(), LockingParams::default());
        assert!(matches!(
            dashboard.preview(&PendingAction::start_unlock(0), Timestamp::new(1)),
            Err(DashboardError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn refresh_publishes_increasing_generations() {
        let provider = NullProvider::default();
        provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 60)
            .unwrap();
        let dashboard = Dashboard::new(provider, alice(), LockingParams::default());

        let first = dashboard.refresh(Timestamp::new(1)).await.unwrap();
        let second = dashboard.refresh(Timestamp::new(2)).await.unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(dashboard.current().unwrap().generation, second.generation);
        assert_eq!(second.rows.len(), 1);
        assert!(second.can_open_position);
    }

    #[test]
    fn in_flight_guard_releases_on_drop() {
        let busy = Mutex::new(HashSet::new());
        let target = ActionTarget::Position(3);
        let guard = InFlight::acquire(&busy, vec![target]).unwrap();
        assert!(matches!(
            InFlight::acquire(&busy, vec![target]),
            Err(DashboardError::ActionInFlight(_))
        ));
        drop(guard);
        assert!(InFlight::acquire(&busy, vec![target]).is_ok());
    }

    #[test]
    fn overlapping_claim_takes_nothing() {
        let busy = Mutex::new(HashSet::new());
        let _single = InFlight::acquire(&busy, vec![ActionTarget::Position(1)]).unwrap();
        let all = vec![
            ActionTarget::AllWithdrawable,
            ActionTarget::Position(0),
            ActionTarget::Position(1),
        ];
        assert!(matches!(
            InFlight::acquire(&busy, all),
            Err(DashboardError::ActionInFlight(ActionTarget::Position(1)))
        ));
        assert_eq!(lock(&busy).len(), 1);
    }

    #[tokio::test]
    async fn withdraw_all_occupies_unlocked_positions() {
        let provider = NullProvider::default();
        provider.set_ledger_time(Timestamp::new(1_000));
        provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 30)
            .unwrap();
        provider
            .add_locked(&alice(), TokenAmount::new(ONE_TOKEN), 30)
            .unwrap();
        provider.start_unlock(&alice(), 0).await.unwrap();
        let dashboard = Dashboard::new(provider, alice(), LockingParams::default());

        let later = Timestamp::new(1_000 + 30 * lockvote_types::MILLIS_PER_DAY);
        let snapshot = dashboard.refresh(later).await.unwrap();
        assert_eq!(
            occupied_targets(&PendingAction::withdraw_all(), &snapshot.summary, later),
            vec![ActionTarget::AllWithdrawable, ActionTarget::Position(0)]
        );
        assert_eq!(
            occupied_targets(&PendingAction::withdraw(0), &snapshot.summary, later),
            vec![ActionTarget::Position(0)]
        );
    }
}
