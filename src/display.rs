//! Text helpers for the admin console.

use chrono::{DateTime, Utc};

use crate::domain::aggregates::Order;

const SUMMARY_WIDTH: usize = 50;

/// "Just now", "12 min ago", "3 hours ago", or the date once a day has passed.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hour{} ago", if hours > 1 { "s" } else { "" });
    }
    then.format("%Y-%m-%d").to_string()
}

/// `Chicken Burger (x2), French Fries (x1)`, cut at 50 characters.
pub fn items_summary(order: &Order) -> String {
    let summary = order
        .items()
        .iter()
        .map(|line| format!("{} (x{})", line.name, line.quantity.value()))
        .collect::<Vec<_>>()
        .join(", ");
    if summary.chars().count() > SUMMARY_WIDTH {
        format!("{}...", summary.chars().take(SUMMARY_WIDTH).collect::<String>())
    } else {
        summary
    }
}
