use proptest::prelude::*;

use lockvote_positions::{
    aggregate, resolve_status, LockingPosition, PositionState, RawLockingPosition,
    StandaloneBalances, TimeRemaining, UnlockStart,
};
use lockvote_types::{LockDuration, Timestamp, TokenAmount, VotingPower, MILLIS_PER_DAY};

fn position(period: u16, started: Option<u64>) -> LockingPosition {
    LockingPosition {
        index: 0,
        amount: TokenAmount::new(1),
        voting_power: VotingPower::new(1),
        locking_period_days: period,
        unlocking_started_at: started.map(Timestamp::new),
    }
}

fn arb_entry() -> impl Strategy<Value = RawLockingPosition> {
    (
        prop::option::weighted(0.95, 0u32..1_000),
        prop::option::weighted(0.9, 0u128..1_000_000_000_000),
        prop::option::weighted(0.9, 0u16..400),
        prop::option::of(0u64..2_000_000_000_000),
    )
        .prop_map(|(index, amount, period, started)| RawLockingPosition {
            index,
            amount: amount.map(TokenAmount::new),
            voting_power: amount.map(|a| VotingPower::new(a * 3)),
            locking_period: period,
            unlocking_started_at: started.map(UnlockStart::At),
        })
}

proptest! {
    /// Positions that never started unlocking are locked at every instant.
    #[test]
    fn absent_start_is_always_locked(period in 0u16..u16::MAX, now in any::<u64>()) {
        let status = resolve_status(&position(period, None), Timestamp::new(now));
        prop_assert_eq!(status.state, PositionState::Locked);
        prop_assert_eq!(status.time_remaining, TimeRemaining::NotApplicable);
    }

    /// The instant start + period is already unlocked.
    #[test]
    fn boundary_is_unlocked(period in 0u16..3_600, start in 1u64..1_000_000_000_000) {
        let p = position(period, Some(start));
        let boundary = Timestamp::new(start + period as u64 * MILLIS_PER_DAY);
        prop_assert_eq!(resolve_status(&p, boundary).state, PositionState::Unlocked);
    }

    /// The countdown never exceeds the gap to the end and is never negative.
    #[test]
    fn remaining_is_clamped(period in 0u16..3_600, start in 1u64..u64::MAX / 2, now in any::<u64>()) {
        let p = position(period, Some(start));
        let status = resolve_status(&p, Timestamp::new(now));
        let ends = start + period as u64 * MILLIS_PER_DAY;
        match status.time_remaining {
            TimeRemaining::Remaining(left) => {
                prop_assert_eq!(status.state, PositionState::Unlocking);
                prop_assert!(now < ends);
                prop_assert_eq!(left, LockDuration::from_millis(ends - now));
            }
            TimeRemaining::Elapsed => prop_assert!(now >= ends),
            TimeRemaining::NotApplicable => prop_assert!(false, "started position reported as locked"),
        }
    }

    /// Summary totals do not depend on the order positions were fetched in.
    #[test]
    fn aggregate_is_order_independent(
        entries in prop::collection::vec(arb_entry(), 0..24),
        now in 0u64..2_500_000_000_000,
        seed in any::<u64>(),
    ) {
        let mut shuffled = entries.clone();
        // Deterministic permutation driven by the seed.
        let len = shuffled.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
        }

        let balances = StandaloneBalances::default();
        let a = aggregate(&entries, &balances, Timestamp::new(now));
        let b = aggregate(&shuffled, &balances, Timestamp::new(now));
        prop_assert_eq!(a.locked, b.locked);
        prop_assert_eq!(a.unlocking, b.unlocking);
        prop_assert_eq!(a.to_withdraw, b.to_withdraw);
        prop_assert_eq!(a.locked_voting_power, b.locked_voting_power);
        prop_assert_eq!(a.eligible_actions(), b.eligible_actions());
        prop_assert_eq!(a.skipped.len(), b.skipped.len());
    }

    /// Aggregating the same snapshot twice gives identical output.
    #[test]
    fn aggregate_is_idempotent(
        entries in prop::collection::vec(arb_entry(), 0..24),
        now in 0u64..2_500_000_000_000,
    ) {
        let balances = StandaloneBalances {
            voting_power_available: VotingPower::new(10),
            voting_power_in_use: VotingPower::new(4),
            ..StandaloneBalances::default()
        };
        let first = aggregate(&entries, &balances, Timestamp::new(now));
        let second = aggregate(&entries, &balances, Timestamp::new(now));
        prop_assert_eq!(first, second);
    }

    /// Every entry ends up either in the summary or in the skipped list, and
    /// the three totals account for every kept position.
    #[test]
    fn partition_is_complete(
        entries in prop::collection::vec(arb_entry(), 0..24),
        now in 0u64..2_500_000_000_000,
    ) {
        let summary = aggregate(&entries, &StandaloneBalances::default(), Timestamp::new(now));
        prop_assert_eq!(summary.positions.len() + summary.skipped.len(), entries.len());
        let kept: TokenAmount = summary.locking_positions().map(|p| p.amount).sum();
        prop_assert_eq!(
            summary.locked.raw() + summary.unlocking.raw() + summary.to_withdraw.raw(),
            kept.raw()
        );
    }
}
