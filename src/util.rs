//! Shared calendar-day helpers.
//!
//! All practice arithmetic works on `NaiveDate` calendar days in local
//! time. Display formatting lives here so the export document and the CLI
//! render dates the same way.

use chrono::{Local, NaiveDate};

use crate::error::{AlmanackError, Result};

/// ISO calendar-day format used for parsing CLI input and stored dates.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Today as a calendar day in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` string into a calendar day.
///
/// # Errors
///
/// Returns a validation error when the string is not a valid ISO day.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DAY_FORMAT)
        .map_err(|e| AlmanackError::validation(format!("invalid date '{input}': {e}")))
}

/// Signed whole-day difference `to - from`.
pub fn day_diff(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Long display form, e.g. `January 5, 2026`.
pub fn format_long(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}

/// Short display form, e.g. `Jan 5`.
pub fn format_short(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}
