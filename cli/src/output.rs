//! Plain-text rendering of dashboard snapshots.

use lockvote_dashboard::DashboardSnapshot;
use lockvote_positions::{ActionPreview, PendingAction};
use lockvote_types::VoterId;
use std::fmt::Write;

pub fn render_summary(voter: &VoterId, snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let totals = &snapshot.totals;
    let _ = writeln!(out, "voter {voter} at {}", snapshot.evaluated_at.as_millis());
    let _ = writeln!(out, "  voting power available  {}", totals.voting_power_available);
    let _ = writeln!(out, "  voting power in use     {}", totals.voting_power_in_use);
    let _ = writeln!(out, "  voting power free       {}", totals.voting_power_free);
    let _ = writeln!(out, "  locked                  {}", totals.locked);
    let _ = writeln!(out, "  unlocking               {}", totals.unlocking);
    let _ = writeln!(out, "  to withdraw             {}", totals.to_withdraw);
    let _ = writeln!(
        out,
        "  withdraw all            {}",
        if snapshot.withdraw_all_enabled { "enabled" } else { "disabled" }
    );

    if snapshot.rows.is_empty() {
        let _ = writeln!(out, "\nno locking positions");
    } else {
        let _ = writeln!(
            out,
            "\n{:>5}  {:>24}  {:>7}  {:<13}  {:<12}  {}",
            "index", "amount", "period", "status", "remaining", "action"
        );
        for row in &snapshot.rows {
            let action = if row.action_enabled {
                row.action_label.to_string()
            } else {
                format!("{} (unavailable)", row.action_label)
            };
            let _ = writeln!(
                out,
                "{:>5}  {:>24}  {:>6}d  {:<13}  {:<12}  {}",
                row.index,
                row.amount.raw(),
                row.locking_period_days,
                row.badge.label,
                row.remaining,
                action
            );
        }
    }

    if snapshot.skipped_entries > 0 {
        let _ = writeln!(out, "\n{} malformed entries skipped", snapshot.skipped_entries);
    }
    for warning in &snapshot.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}

pub fn render_preview(pending: &PendingAction, preview: &ActionPreview) -> String {
    let mut out = format!("{} on {:?}: eligible", pending.kind.name(), pending.target);
    if let Some(power) = preview.projected_voting_power {
        let _ = write!(out, "\n  projected voting power  {power}");
    }
    if let Some(amount) = preview.released_amount {
        let _ = write!(out, "\n  released amount         {amount}");
    }
    out
}
