//! Voting power formula.
//!
//! Voting power grows linearly with the locking period: locking for
//! `voting_power_base_days` yields 1x, twice as long yields 2x. Amounts are
//! 6-decimal token units; voting power carries 24 decimals.

use lockvote_types::{Days, LockingParams, LockvoteError, TokenAmount, VotingPower, E18};

/// `amount × 10^18 × days / base_days`, rounded down.
pub fn calculate_voting_power(
    amount: TokenAmount,
    days: Days,
    params: &LockingParams,
) -> Result<VotingPower, LockvoteError> {
    if params.voting_power_base_days == 0 {
        return Err(LockvoteError::InvalidParams(
            "voting_power_base_days must be non-zero".into(),
        ));
    }
    let scaled = amount
        .raw()
        .checked_mul(E18)
        .and_then(|base| base.checked_mul(days as u128))
        .ok_or(LockvoteError::Overflow("voting power"))?;
    Ok(VotingPower::new(
        scaled / params.voting_power_base_days as u128,
    ))
}
