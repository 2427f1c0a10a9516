use chrono::{Local, NaiveDate};
use thiserror::Error;

/// Display format for calendar days (DD/MM/YYYY)
pub const DAY_FORMAT: &str = "%d/%m/%Y";

/// Formats accepted when parsing a day, tried in order
const ACCEPTED_FORMATS: [&str; 2] = ["%Y-%m-%d", DAY_FORMAT];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid day '{0}', expected YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDay(String),
    #[error("first day {first} is after last day {last}")]
    InvertedRange { first: NaiveDate, last: NaiveDate },
}

/// Parses a calendar day in either ISO (2024-07-01) or day-first (01/07/2024) form
pub fn parse_day(value: &str) -> Result<NaiveDate, DateError> {
    let trimmed = value.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| DateError::InvalidDay(trimmed.to_string()))
}

/// Formats a calendar day for display
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Formats an inclusive range of days, e.g. "01/07/2024 - 05/07/2024"
pub fn format_range(first: NaiveDate, last: NaiveDate) -> String {
    format!("{} - {}", format_day(first), format_day(last))
}

/// Current day in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
