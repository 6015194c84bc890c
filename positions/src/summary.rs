//! Voter summary aggregation.
//!
//! Folds a voter's fetched positions into per-state token totals and the
//! per-position action map. The voting-power figures are not derived here:
//! they reflect allocations (votes cast on proposals) that are independent of
//! which positions are locked, so they are carried through from the
//! standalone balances unchanged.

use lockvote_types::{LockingParams, PositionIndex, Timestamp, TokenAmount, VotingPower};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::actions::PositionAction;
use crate::error::PositionError;
use crate::position::{LockingPosition, RawLockingPosition};
use crate::status::{resolve_status, PositionState, PositionStatus};

/// Balance figures fetched independently of the position list.
///
/// The per-state totals are optional; when present they are only used to
/// cross-check the totals derived from positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneBalances {
    pub voting_power_available: VotingPower,
    pub voting_power_in_use: VotingPower,
    #[serde(default)]
    pub locked_total: Option<TokenAmount>,
    #[serde(default)]
    pub unlocking_total: Option<TokenAmount>,
    #[serde(default)]
    pub withdraw_total: Option<TokenAmount>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceKind {
    Locked,
    Unlocking,
    Withdrawable,
}

/// A standalone total that disagrees with the position-derived one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDiscrepancy {
    pub kind: BalanceKind,
    pub derived: TokenAmount,
    pub reported: TokenAmount,
}

/// A position entry excluded from the summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Offset of the entry in the fetched list.
    pub offset: usize,
    pub error: PositionError,
}

/// A valid position together with its status and primary action at evaluation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPosition {
    pub position: LockingPosition,
    pub status: PositionStatus,
    pub action: PositionAction,
}

/// Immutable dashboard summary for one voter, recomputed on every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterSummary {
    pub voting_power_available: VotingPower,
    pub voting_power_in_use: VotingPower,
    /// Sum of amounts over locked positions.
    pub locked: TokenAmount,
    /// Sum of amounts over unlocking positions.
    pub unlocking: TokenAmount,
    /// Sum of amounts over unlocked, not yet withdrawn positions.
    pub to_withdraw: TokenAmount,
    /// Voting power backed by locked positions.
    pub locked_voting_power: VotingPower,
    /// Valid positions in fetch order.
    pub positions: Vec<ResolvedPosition>,
    pub skipped: Vec<SkippedEntry>,
    pub discrepancies: Vec<BalanceDiscrepancy>,
    pub evaluated_at: Timestamp,
}

impl VoterSummary {
    pub fn locking_positions(&self) -> impl Iterator<Item = &LockingPosition> {
        self.positions.iter().map(|p| &p.position)
    }

    pub fn position(&self, index: PositionIndex) -> Option<&ResolvedPosition> {
        self.positions.iter().find(|p| p.position.index == index)
    }

    /// The primary action enabled for each position.
    pub fn eligible_actions(&self) -> BTreeMap<PositionIndex, PositionAction> {
        self.positions
            .iter()
            .map(|p| (p.position.index, p.action))
            .collect()
    }

    pub fn action_for(&self, index: PositionIndex) -> Option<PositionAction> {
        self.position(index).map(|p| p.action)
    }

    /// Withdraw-all is enabled only when something is withdrawable.
    pub fn withdraw_all_enabled(&self) -> bool {
        !self.to_withdraw.is_zero()
    }

    /// Indexes of unlocked positions, the ones withdraw-all would clear.
    pub fn withdrawable_indexes(&self) -> Vec<PositionIndex> {
        self.positions
            .iter()
            .filter(|p| p.status.state == PositionState::Unlocked)
            .map(|p| p.position.index)
            .collect()
    }

    /// Voting power not allocated to any vote.
    pub fn voting_power_free(&self) -> VotingPower {
        self.voting_power_available
            .saturating_sub(self.voting_power_in_use)
    }

    /// Whether in-use power fits inside available power.
    pub fn is_consistent(&self) -> bool {
        self.voting_power_in_use <= self.voting_power_available
    }

    /// Whether the voter is below the per-voter position cap.
    pub fn can_open_position(&self, params: &LockingParams) -> bool {
        self.positions.len() + self.skipped.len() < params.max_locking_positions as usize
    }
}

/// Build the summary for `entries` as of `now`.
///
/// Best-effort: malformed entries, and every entry sharing an index with
/// another, are listed in `skipped` and left out of all totals. Totals do not
/// depend on the order of `entries`.
pub fn aggregate(
    entries: &[RawLockingPosition],
    balances: &StandaloneBalances,
    now: Timestamp,
) -> VoterSummary {
    let parsed: Vec<Result<LockingPosition, PositionError>> =
        entries.iter().map(LockingPosition::try_from).collect();

    let mut index_counts: HashMap<PositionIndex, usize> = HashMap::new();
    for position in parsed.iter().flatten() {
        *index_counts.entry(position.index).or_default() += 1;
    }

    let mut positions = Vec::with_capacity(parsed.len());
    let mut skipped = Vec::new();
    for (offset, result) in parsed.into_iter().enumerate() {
        let result = result.and_then(|position| {
            if index_counts.get(&position.index).copied().unwrap_or(0) > 1 {
                Err(PositionError::DuplicateIndex(position.index))
            } else {
                Ok(position)
            }
        });
        match result {
            Ok(position) => {
                let status = resolve_status(&position, now);
                let action = PositionAction::for_state(status.state);
                tracing::debug!(
                    index = position.index,
                    state = ?status.state,
                    remaining = %status.time_remaining,
                    "resolved position"
                );
                positions.push(ResolvedPosition {
                    position,
                    status,
                    action,
                });
            }
            Err(error) => {
                tracing::warn!(offset, %error, "skipping position entry");
                skipped.push(SkippedEntry { offset, error });
            }
        }
    }

    let total_in = |state: PositionState| -> TokenAmount {
        positions
            .iter()
            .filter(|p| p.status.state == state)
            .map(|p| p.position.amount)
            .sum()
    };
    let locked = total_in(PositionState::Locked);
    let unlocking = total_in(PositionState::Unlocking);
    let to_withdraw = total_in(PositionState::Unlocked);
    let locked_voting_power = positions
        .iter()
        .filter(|p| p.status.state == PositionState::Locked)
        .map(|p| p.position.voting_power)
        .sum();

    let discrepancies = [
        (BalanceKind::Locked, locked, balances.locked_total),
        (BalanceKind::Unlocking, unlocking, balances.unlocking_total),
        (BalanceKind::Withdrawable, to_withdraw, balances.withdraw_total),
    ]
    .into_iter()
    .filter_map(|(kind, derived, reported)| {
        let reported = reported?;
        (reported != derived).then_some(BalanceDiscrepancy {
            kind,
            derived,
            reported,
        })
    })
    .inspect(|d| {
        tracing::warn!(
            kind = ?d.kind,
            derived = d.derived.raw(),
            reported = d.reported.raw(),
            "standalone balance disagrees with positions"
        )
    })
    .collect();

    if balances.voting_power_in_use > balances.voting_power_available {
        tracing::warn!(
            available = balances.voting_power_available.raw(),
            in_use = balances.voting_power_in_use.raw(),
            "voting power in use exceeds available"
        );
    }

    VoterSummary {
        voting_power_available: balances.voting_power_available,
        voting_power_in_use: balances.voting_power_in_use,
        locked,
        unlocking,
        to_withdraw,
        locked_voting_power,
        positions,
        skipped,
        discrepancies,
        evaluated_at: now,
    }
}
