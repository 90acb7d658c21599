//! Pure checks on user input. Nothing in here touches the database.

use crate::error::{AttendanceError, Result};
use crate::models::{DateInput, Status};
use crate::periods::{FIRST_PERIOD, LAST_PERIOD};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// The only accepted date format for text input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Returns `true` iff `status` is exactly one of the [`Status`] names.
pub fn validate_status(status: &str) -> bool {
    status.parse::<Status>().is_ok()
}

/// Returns `true` iff `period` is one of the five periods of the day.
pub fn validate_period(period: i32) -> bool {
    (FIRST_PERIOD..=LAST_PERIOD).contains(&period)
}

/// Resolves an optional date, defaulting to today.
///
/// Text must be in `YYYY-MM-DD` form, otherwise [`AttendanceError::InvalidDateFormat`] is
/// returned.
pub fn parse_date(input: Option<&DateInput>) -> Result<NaiveDate> {
    match input {
        None => Ok(today()),
        Some(DateInput::Date(date)) => Ok(*date),
        Some(DateInput::Text(text)) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .map_err(|_| AttendanceError::InvalidDateFormat(text.clone())),
    }
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Returns `true` if `email` looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// The form an email is stored and compared in.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
