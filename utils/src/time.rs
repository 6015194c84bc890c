//! Time formatting helpers.

use lockvote_types::LockDuration;

/// Format a whole number of days, e.g. "1 day", "30 days".
pub fn format_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Format a countdown at day/hour resolution.
///
/// A partial day is shown in hours only when there are no whole days left.
/// Any time left under one hour reads as "<1 hour", so a running countdown
/// never shows "0 days".
pub fn format_remaining(remaining: LockDuration) -> String {
    if remaining.is_zero() {
        return format_days(0);
    }
    let days = remaining.whole_days();
    let hours = remaining.remainder_hours();
    match (days, hours) {
        (0, 0) => "<1 hour".to_string(),
        (0, 1) => "1 hour".to_string(),
        (0, h) => format!("{} hours", h),
        (d, 0) => format_days(d),
        (d, h) => format!("{} {}h", format_days(d), h),
    }
}
