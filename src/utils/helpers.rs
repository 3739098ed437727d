//! Helper functions and utilities
//!
//! Formatting of slot times and parsing of the free-text slot format.

use std::sync::OnceLock;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use crate::utils::errors::{BookingError, Result};

/// Storage and display format for slot timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Format of a calendar day in tokens and prompts
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of a clock time without date
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

fn slot_times_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\n(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})$")
            .expect("slot times pattern is valid")
    })
}

/// Parse the two-line slot format: start on the first line, end on the second.
///
/// Ordering of the two instants is not checked here; that is the job of
/// slot creation, which reports `InvalidRange`.
pub fn parse_slot_times(text: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let normalized = text.trim().replace("\r\n", "\n");
    let captures = slot_times_pattern()
        .captures(&normalized)
        .ok_or_else(|| BookingError::malformed("slot times do not match the expected format"))?;

    let parse = |value: &str| {
        NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
            .map_err(|e| BookingError::malformed(format!("invalid date or time '{}': {}", value, e)))
    };

    Ok((parse(&captures[1])?, parse(&captures[2])?))
}

/// Parse a calendar day as used in tokens
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| BookingError::malformed(format!("invalid date '{}': {}", text, e)))
}

pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn format_clock(value: NaiveTime) -> String {
    value.format(CLOCK_FORMAT).to_string()
}

/// Build a display name from Telegram's first/last name pair
pub fn display_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last) if !last.trim().is_empty() => normalize_whitespace(&format!("{} {}", first_name, last)),
        _ => normalize_whitespace(first_name),
    }
}

/// Build a contact handle ("@username") or an empty string
pub fn handle(username: Option<&str>) -> String {
    username
        .filter(|name| !name.is_empty())
        .map(|name| format!("@{}", name))
        .unwrap_or_default()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
