use chrono::{DateTime, Duration, Utc};

use crate::config::DispatchConfig;
use crate::model::{Order, Priority};

/// Urgency from waiting time. Thresholds are strict: waiting exactly the
/// urgent threshold is still only high.
pub fn delivery_priority(
    config: &DispatchConfig,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Priority {
    let hours_waiting = (now - created_at).num_milliseconds() as f64 / 3_600_000.0;
    if hours_waiting > config.urgent_after_hours {
        Priority::Urgent
    } else if hours_waiting > config.high_after_hours {
        Priority::High
    } else {
        Priority::Normal
    }
}

/// Find a recent order with the same phone and the exact same address string
/// placed after `now - window`. The candidate itself (same id) is ignored.
/// A window reaching before the earliest representable time has no lower bound.
pub fn find_duplicate<'a>(
    candidate: &Order,
    recent: &'a [Order],
    now: DateTime<Utc>,
    window: Duration,
) -> Option<&'a Order> {
    let since = now.checked_sub_signed(window);
    recent.iter().find(|existing| {
        existing.id != candidate.id
            && existing.customer_phone == candidate.customer_phone
            && existing.delivery_address == candidate.delivery_address
            && since.is_none_or(|since| existing.created_at > since)
    })
}

pub fn is_duplicate(
    candidate: &Order,
    recent: &[Order],
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    find_duplicate(candidate, recent, now, window).is_some()
}
