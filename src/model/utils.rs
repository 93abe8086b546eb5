use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// "Updated 3 minutes ago" style label for the last accepted hole edit.
#[must_use]
pub fn format_last_updated(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match updated_at {
        Some(ts) => format!("Updated {}", format_time_ago(now - ts)),
        None => "No scores yet".to_string(),
    }
}

#[must_use]
pub fn format_time_ago(td: ChronoDuration) -> String {
    let secs = td.num_seconds().max(0);

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    let (count, unit) = if secs >= DAY {
        (secs / DAY, "day")
    } else if secs >= HOUR {
        (secs / HOUR, "hour")
    } else if secs >= MINUTE {
        (secs / MINUTE, "minute")
    } else if secs < 10 {
        return "just now".to_string();
    } else {
        (secs, "second")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
