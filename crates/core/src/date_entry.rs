//! Expiry date entry.
//!
//! Dates arrive either from a picker (`YYYY-MM-DD`) or typed by hand. Hand
//! entry keeps only digits and reformats them as `dd/mm/yyyy` while typing;
//! the date is accepted once all eight digits form a real calendar date.

use chrono::NaiveDate;

/// Length of a complete `dd/mm/yyyy` value.
const COMPLETE_LEN: usize = 10;
const MAX_DIGITS: usize = 8;

/// Errors from [`parse_manual_date`] and [`parse_date_input`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateEntryError {
    /// Fewer than eight digits were typed.
    #[error("incomplete date '{0}', expected dd/mm/yyyy")]
    Incomplete(String),
    /// Eight digits that do not name a calendar day (e.g. 31/02/2024).
    #[error("'{0}' is not a valid date")]
    Invalid(String),
}

/// Reformat raw keyboard input as a partial `dd/mm/yyyy` date.
///
/// ```
/// use dispensa_core::date_entry::format_manual_date;
///
/// assert_eq!(format_manual_date("0"), "0");
/// assert_eq!(format_manual_date("0503"), "05/03");
/// assert_eq!(format_manual_date("05-03-2025 extra 9"), "05/03/2025");
/// ```
#[must_use]
pub fn format_manual_date(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();

    let mut out = String::with_capacity(COMPLETE_LEN);
    for (i, c) in digits.chars().enumerate() {
        if i == 2 || i == 4 {
            out.push('/');
        }
        out.push(c);
    }
    out
}

/// Parse a hand-typed date.
///
/// # Errors
///
/// Returns [`DateEntryError::Incomplete`] until eight digits are present and
/// [`DateEntryError::Invalid`] when they do not form a calendar date.
pub fn parse_manual_date(input: &str) -> Result<NaiveDate, DateEntryError> {
    let formatted = format_manual_date(input);
    if formatted.len() != COMPLETE_LEN {
        return Err(DateEntryError::Incomplete(formatted));
    }

    NaiveDate::parse_from_str(&formatted, "%d/%m/%Y")
        .map_err(|_| DateEntryError::Invalid(formatted))
}

/// Parse either a picker value (`YYYY-MM-DD`) or a hand-typed date.
///
/// # Errors
///
/// Same as [`parse_manual_date`] when the input is not an ISO date.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, DateEntryError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_manual_date(trimmed)
}
