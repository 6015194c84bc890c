//! Locking parameters of the voting-power program.
//!
//! These mirror the ledger's configuration; lockvote only reads them to judge
//! whether a requested action would be accepted.

use crate::amount::TokenAmount;
use crate::error::LockvoteError;
use crate::Days;
use serde::{Deserialize, Serialize};

/// One whole governance token in raw units (6 decimals).
pub const ONE_TOKEN: u128 = 1_000_000;

/// Scale from 6-decimal token units to 24-decimal voting power.
pub const E18: u128 = 1_000_000_000_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingParams {
    /// Shortest locking period a position may be (re)locked for.
    #[serde(default = "default_min_locking_days")]
    pub min_locking_days: Days,

    /// Longest locking period a position may be (re)locked for.
    #[serde(default = "default_max_locking_days")]
    pub max_locking_days: Days,

    /// Period at which voting power equals the locked amount (multiplier 1x).
    #[serde(default = "default_voting_power_base_days")]
    pub voting_power_base_days: Days,

    /// Smallest amount a position may hold.
    #[serde(default = "default_min_deposit_amount")]
    pub min_deposit_amount: TokenAmount,

    /// Maximum number of simultaneous positions per voter.
    #[serde(default = "default_max_locking_positions")]
    pub max_locking_positions: u8,
}

fn default_min_locking_days() -> Days {
    30
}

fn default_max_locking_days() -> Days {
    300
}

fn default_voting_power_base_days() -> Days {
    60
}

fn default_min_deposit_amount() -> TokenAmount {
    TokenAmount::new(ONE_TOKEN)
}

fn default_max_locking_positions() -> u8 {
    20
}

impl LockingParams {
    /// Check the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), LockvoteError> {
        if self.min_locking_days >= self.max_locking_days {
            return Err(LockvoteError::InvalidParams(format!(
                "min_locking_days ({}) must be below max_locking_days ({})",
                self.min_locking_days, self.max_locking_days
            )));
        }
        if self.voting_power_base_days == 0 {
            return Err(LockvoteError::InvalidParams(
                "voting_power_base_days must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Whether `days` lies within `[min_locking_days, max_locking_days]`.
    pub fn accepts_period(&self, days: Days) -> bool {
        (self.min_locking_days..=self.max_locking_days).contains(&days)
    }
}

impl Default for LockingParams {
    fn default() -> Self {
        Self {
            min_locking_days: default_min_locking_days(),
            max_locking_days: default_max_locking_days(),
            voting_power_base_days: default_voting_power_base_days(),
            min_deposit_amount: default_min_deposit_amount(),
            max_locking_positions: default_max_locking_positions(),
        }
    }
}
