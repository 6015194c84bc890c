//! Voter snapshot: the ledger's JSON view of one voter.
//!
//! ```json
//! {
//!   "voter_id": "alice.near",
//!   "balance_in_contract": "0",
//!   "locking_positions": [ { "index": 0, "amount": "...", ... } ],
//!   "voting_power": "...",
//!   "vote_positions": [ { "votable_address": "...", "votable_object_id": "...", "voting_power": "..." } ]
//! }
//! ```
//!
//! The ledger's `voting_power` is the power not yet allocated to votes; the
//! power in use is the sum over `vote_positions`.

use lockvote_positions::{RawLockingPosition, StandaloneBalances};
use lockvote_types::{TokenAmount, VoterId, VotingPower};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePosition {
    pub votable_address: String,
    pub votable_object_id: String,
    pub voting_power: VotingPower,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoterSnapshot {
    pub voter_id: VoterId,
    /// Tokens already withdrawn from positions into the voter's balance.
    #[serde(default)]
    pub balance_in_contract: TokenAmount,
    /// Kept undecoded so that one malformed entry cannot fail the whole snapshot.
    #[serde(default)]
    pub locking_positions: Vec<serde_json::Value>,
    /// Voting power not allocated to any vote.
    #[serde(default)]
    pub voting_power: VotingPower,
    #[serde(default)]
    pub vote_positions: Vec<VotePosition>,
}

impl VoterSnapshot {
    pub fn from_json_str(s: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(s).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, ProviderError> {
        serde_json::to_string_pretty(self).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    pub fn positions(&self) -> Vec<RawLockingPosition> {
        self.locking_positions
            .iter()
            .cloned()
            .map(RawLockingPosition::from_value)
            .collect()
    }

    pub fn voting_power_in_use(&self) -> VotingPower {
        self.vote_positions.iter().map(|v| v.voting_power).sum()
    }

    /// Available power counts both free and allocated power, so that
    /// `available - in_use` is what the voter can still allocate.
    pub fn balances(&self) -> StandaloneBalances {
        let in_use = self.voting_power_in_use();
        StandaloneBalances {
            voting_power_available: self.voting_power.saturating_add(in_use),
            voting_power_in_use: in_use,
            locked_total: None,
            unlocking_total: None,
            withdraw_total: None,
        }
    }
}
