//! Read side: fetching a voter's positions and balances.

use async_trait::async_trait;
use lockvote_positions::{RawLockingPosition, StandaloneBalances};
use lockvote_types::VoterId;

use crate::error::ProviderError;

#[async_trait]
pub trait VoterDataProvider: Send + Sync {
    /// All of the voter's positions, in the provider's order.
    async fn fetch_positions(&self, voter: &VoterId)
        -> Result<Vec<RawLockingPosition>, ProviderError>;

    /// Voting power figures, plus whatever per-state totals the provider reports.
    async fn fetch_standalone_balances(
        &self,
        voter: &VoterId,
    ) -> Result<StandaloneBalances, ProviderError>;
}
