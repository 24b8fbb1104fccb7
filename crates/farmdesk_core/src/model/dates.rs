//! Calendar date helpers shared by mapping and aggregation code.

use chrono::{DateTime, Datelike, NaiveDate};

const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored date, accepting `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Returns `None` for anything else.
pub fn parse_store_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, STORE_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, STORE_DATE_FORMAT).ok())
}

/// Formats a date the way the store keeps it.
pub fn format_store_date(date: NaiveDate) -> String {
    date.format(STORE_DATE_FORMAT).to_string()
}

/// Returns whether `date` falls in the calendar month and year of `today`.
pub fn is_same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Returns any date inside the calendar month before `today`'s month.
pub fn previous_month(today: NaiveDate) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month.pred_opt().unwrap_or(first_of_month)
}
