use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// UTC calendar-date helpers shared by the scheduling logic.
///
/// Due dates and payment timestamps are stored as TEXT, so everything here
/// parses defensively and works on explicit (year, month, day) components.
/// Local-timezone date construction is never used: a due date is a calendar
/// date, not an instant, and mixing in an offset shifts it by a day.

/// Parse a stored date value down to its UTC calendar date.
///
/// Accepts RFC 3339 timestamps (normalized to UTC before taking the date),
/// `YYYY-MM-DD HH:MM:SS` timestamps, and plain `YYYY-MM-DD` dates (trailing
/// garbage after the date part is ignored). Returns `None` for anything else.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.to_utc().date_naive());
    }

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(timestamp.date());
    }

    NaiveDate::parse_from_str(trimmed.get(..10)?, "%Y-%m-%d").ok()
}

/// Calendar month immediately after the given one, rolling the year forward
/// across December
pub fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Number of days in a month, computed as the day before the first of the
/// following month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = following_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Format calendar components as an ISO `YYYY-MM-DD` date string
pub fn format_calendar_date(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}
