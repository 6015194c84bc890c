//! End-to-end scenarios over ledger-shaped JSON position entries.

use lockvote_positions::{
    aggregate, describe_remaining_time, PositionAction, PositionError, PositionState,
    RawLockingPosition, StandaloneBalances,
};
use lockvote_types::{Timestamp, TokenAmount, MILLIS_PER_DAY};
use serde_json::json;

const NOW: u64 = 1_760_000_000_000;

fn entries(values: Vec<serde_json::Value>) -> Vec<RawLockingPosition> {
    values.into_iter().map(RawLockingPosition::from_value).collect()
}

fn days_ago(days: u64) -> u64 {
    NOW - days * MILLIS_PER_DAY
}

#[test]
fn unlocking_halfway() {
    let raw = entries(vec![json!({
        "index": 0,
        "amount": "1000",
        "voting_power": "500",
        "locking_period": 30,
        "unlocking_started_at": days_ago(15),
    })]);
    let summary = aggregate(&raw, &StandaloneBalances::default(), Timestamp::new(NOW));
    let resolved = summary.position(0).unwrap();
    assert_eq!(resolved.status.state, PositionState::Unlocking);
    assert_eq!(resolved.action, PositionAction::Relock);
    assert_eq!(
        describe_remaining_time(&resolved.position, Timestamp::new(NOW)),
        "15 days"
    );
    assert_eq!(summary.unlocking, TokenAmount::new(1000));
}

#[test]
fn unlocked_contributes_to_withdraw() {
    let raw = entries(vec![json!({
        "index": 0,
        "amount": "500",
        "voting_power": "0",
        "locking_period": 10,
        "unlocking_started_at": days_ago(20),
    })]);
    let summary = aggregate(&raw, &StandaloneBalances::default(), Timestamp::new(NOW));
    let resolved = summary.position(0).unwrap();
    assert_eq!(resolved.status.state, PositionState::Unlocked);
    assert_eq!(resolved.status.time_remaining.to_string(), "0 days");
    assert_eq!(resolved.action, PositionAction::Withdraw);
    assert_eq!(summary.to_withdraw, TokenAmount::new(500));
}

#[test]
fn mixed_locked_and_unlocked() {
    let raw = entries(vec![
        json!({ "index": 0, "amount": "200", "voting_power": "100", "locking_period": 60 }),
        json!({
            "index": 1,
            "amount": 300,
            "voting_power": "0",
            "locking_period": 30,
            "unlocking_started_at": days_ago(31),
        }),
    ]);
    let summary = aggregate(&raw, &StandaloneBalances::default(), Timestamp::new(NOW));
    assert_eq!(summary.locked, TokenAmount::new(200));
    assert_eq!(summary.to_withdraw, TokenAmount::new(300));
    assert_eq!(summary.unlocking, TokenAmount::ZERO);
    assert!(summary.withdraw_all_enabled());
}

#[test]
fn garbage_entries_do_not_abort() {
    let raw = entries(vec![
        json!(null),
        json!({ "index": 3, "voting_power": "1", "locking_period": 30 }),
        json!({ "index": 4, "amount": "70", "voting_power": "1", "locking_period": 30 }),
        json!("surprise"),
    ]);
    let summary = aggregate(&raw, &StandaloneBalances::default(), Timestamp::new(NOW));
    assert_eq!(summary.positions.len(), 1);
    assert_eq!(summary.skipped.len(), 3);
    assert_eq!(summary.locked, TokenAmount::new(70));
}

#[test]
fn unreadable_unlock_start_is_skipped_not_counted_as_locked() {
    let raw = entries(vec![
        json!({
            "index": 0,
            "amount": "500",
            "voting_power": "0",
            "locking_period": 10,
            "unlocking_started_at": days_ago(20).to_string(),
        }),
        json!({
            "index": 1,
            "amount": "40",
            "voting_power": "1",
            "locking_period": 30,
            "unlocking_started_at": null,
        }),
    ]);
    let summary = aggregate(&raw, &StandaloneBalances::default(), Timestamp::new(NOW));
    assert_eq!(summary.positions.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(
        summary.skipped[0].error,
        PositionError::MalformedField("unlocking_started_at")
    );
    assert_eq!(summary.action_for(0), None);
    assert_eq!(summary.locked, TokenAmount::new(40));
    assert_eq!(summary.to_withdraw, TokenAmount::ZERO);
}

#[test]
fn status_moves_with_the_clock_alone() {
    let raw = entries(vec![json!({
        "index": 0,
        "amount": "10",
        "voting_power": "0",
        "locking_period": 30,
        "unlocking_started_at": NOW,
    })]);
    let balances = StandaloneBalances::default();
    let during = aggregate(&raw, &balances, Timestamp::new(NOW + 29 * MILLIS_PER_DAY));
    let after = aggregate(&raw, &balances, Timestamp::new(NOW + 30 * MILLIS_PER_DAY));
    assert_eq!(during.action_for(0), Some(PositionAction::Relock));
    assert_eq!(after.action_for(0), Some(PositionAction::Withdraw));
}
