//! One rendered row per locking position.

use lockvote_positions::{
    PendingAction, PositionAction, PositionState, ResolvedPosition, VoterSummary,
};
use lockvote_types::{Days, LockingParams, PositionIndex, TokenAmount, VotingPower};
use serde::Serialize;

use crate::badge::StatusBadge;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionRow {
    pub index: PositionIndex,
    pub amount: TokenAmount,
    pub voting_power: VotingPower,
    pub locking_period_days: Days,
    pub state: PositionState,
    /// Countdown text, "—" while locked.
    pub remaining: String,
    pub action: PositionAction,
    pub action_label: &'static str,
    pub badge: StatusBadge,
    /// Whether the primary action, with its default parameters, would pass
    /// validation at the snapshot's evaluation time.
    pub action_enabled: bool,
}

impl PositionRow {
    pub fn build(resolved: &ResolvedPosition, summary: &VoterSummary, params: &LockingParams) -> Self {
        let position = &resolved.position;
        let action_enabled = PendingAction::primary_for(position, resolved.action)
            .validate(summary, params, summary.evaluated_at)
            .is_ok();
        Self {
            index: position.index,
            amount: position.amount,
            voting_power: position.voting_power,
            locking_period_days: position.locking_period_days,
            state: resolved.status.state,
            remaining: resolved.status.time_remaining.to_string(),
            action: resolved.action,
            action_label: resolved.action.label(),
            badge: StatusBadge::for_state(resolved.status.state),
            action_enabled,
        }
    }

    /// The pending action the row's button opens the confirmation step with.
    pub fn pending_action(&self, summary: &VoterSummary) -> Option<PendingAction> {
        summary
            .position(self.index)
            .map(|resolved| PendingAction::primary_for(&resolved.position, self.action))
    }
}
