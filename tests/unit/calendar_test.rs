// UTC calendar arithmetic: parsing stored date text, month lengths, and
// month increments. This is where timezone-induced off-by-one bugs would
// live, so the edges get their own suite.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use tallybook::core::calendar::{
    days_in_month, following_month, format_calendar_date, parse_calendar_date,
};

#[test]
fn test_parse_plain_date() {
    assert_eq!(
        parse_calendar_date("2024-06-05"),
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
}

#[test]
fn test_parse_date_with_trailing_text() {
    // Stored values sometimes carry a time suffix the date part should win over
    assert_eq!(
        parse_calendar_date("2024-06-05T00:00:00"),
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
}

#[test]
fn test_parse_sql_timestamp() {
    assert_eq!(
        parse_calendar_date("2024-06-05 23:59:59"),
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
}

#[test]
fn test_parse_rfc3339_normalizes_to_utc() {
    // Late evening west of Greenwich is already the next UTC day
    assert_eq!(
        parse_calendar_date("2024-12-31T22:00:00-05:00"),
        NaiveDate::from_ymd_opt(2025, 1, 1)
    );

    // And early morning east of Greenwich is still the previous UTC day
    assert_eq!(
        parse_calendar_date("2024-01-01T03:00:00+09:00"),
        NaiveDate::from_ymd_opt(2023, 12, 31)
    );
}

#[test]
fn test_parse_invalid_inputs() {
    assert_eq!(parse_calendar_date(""), None);
    assert_eq!(parse_calendar_date("tomorrow"), None);
    assert_eq!(parse_calendar_date("2024-13-01"), None);
    assert_eq!(parse_calendar_date("2024-02-30"), None);
}

#[test]
fn test_parse_trims_whitespace() {
    assert_eq!(
        parse_calendar_date("  2024-06-05  "),
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
}

#[test]
fn test_following_month() {
    assert_eq!(following_month(2024, 6), (2024, 7));
    assert_eq!(following_month(2024, 11), (2024, 12));
    assert_eq!(following_month(2024, 12), (2025, 1));
}

#[test]
fn test_days_in_month_table() {
    assert_eq!(days_in_month(2024, 1), 31);
    assert_eq!(days_in_month(2024, 2), 29); // leap
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(2100, 2), 28); // century, not leap
    assert_eq!(days_in_month(2000, 2), 29); // quadricentennial, leap
    assert_eq!(days_in_month(2024, 4), 30);
    assert_eq!(days_in_month(2024, 12), 31);
}

#[test]
fn test_format_zero_pads() {
    assert_eq!(format_calendar_date(2024, 1, 9), "2024-01-09");
    assert_eq!(format_calendar_date(2024, 12, 31), "2024-12-31");
}

proptest! {
    /// Formatting a valid (year, month, day) triple always round-trips
    /// through the parser
    #[test]
    fn prop_format_parse_round_trip(
        year in 1990i32..2200,
        month in 1u32..=12,
        day_seed in 1u32..=31,
    ) {
        let day = day_seed.min(days_in_month(year, month));
        let formatted = format_calendar_date(year, month, day);
        let parsed = parse_calendar_date(&formatted).expect("formatted date must parse");

        prop_assert_eq!(parsed.year(), year);
        prop_assert_eq!(parsed.month(), month);
        prop_assert_eq!(parsed.day(), day);
    }

    /// days_in_month always matches chrono's own calendar
    #[test]
    fn prop_days_in_month_matches_chrono(
        year in 1990i32..2200,
        month in 1u32..=12,
    ) {
        let days = days_in_month(year, month);

        prop_assert!(NaiveDate::from_ymd_opt(year, month, days).is_some());
        prop_assert!(NaiveDate::from_ymd_opt(year, month, days + 1).is_none());
    }
}
