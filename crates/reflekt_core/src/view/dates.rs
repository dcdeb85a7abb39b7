//! Human-facing date labels.
//!
//! Day boundaries follow the local calendar date, not a rolling 24h window.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Returns `Today`, `Yesterday`, or a short date such as `Mar 5, 2024`.
pub fn relative_date_label_in<Tz: TimeZone>(
    timestamp: &DateTime<Utc>,
    now: &DateTime<Utc>,
    tz: &Tz,
) -> String {
    let day = timestamp.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();

    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        day.format("%b %-d, %Y").to_string()
    }
}

/// [`relative_date_label_in`] against the deployment clock.
pub fn relative_date_label(timestamp: &DateTime<Utc>) -> String {
    relative_date_label_in(timestamp, &Utc::now(), &Local)
}

/// Long form used on entry cards and in exports.
///
/// Example: `Tuesday, March 5, 2024 at 10:00 AM`.
pub fn format_entry_timestamp_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String {
    let local = timestamp.with_timezone(tz).naive_local();
    format!(
        "{} at {}",
        local.format("%A, %B %-d, %Y"),
        local.format("%I:%M %p")
    )
}

pub fn format_entry_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_entry_timestamp_in(timestamp, &Local)
}

/// Greeting for the hour of day (0-23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}
