//! Callback tokens
//!
//! Inline keyboard buttons carry a short colon-delimited token that tells the
//! dialogue which record was picked. Tokens are positional:
//!
//! ```text
//! cancel
//! fair_id:<id>
//! fair_id:<id>:name:<text>
//! event_id:<id>
//! event_id:<id>:day:<YYYY-MM-DD>
//! event_id:<id>:des:<text>
//! event_id:<id>:time:<text>
//! slot_id:<id>
//! ```
//!
//! Carried text is everything after the third colon and may itself contain
//! colons.

use std::fmt;
use chrono::NaiveDate;
use crate::utils::errors::{BookingError, Result};
use crate::utils::helpers::{format_date, parse_date};

/// Telegram rejects callback data longer than this many bytes
pub const MAX_TOKEN_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackToken {
    Cancel,
    Fair { fair_id: i64 },
    FairWithName { fair_id: i64, name: String },
    Event { event_id: i64 },
    EventDay { event_id: i64, day: NaiveDate },
    EventWithDescription { event_id: i64, description: String },
    EventWithTimes { event_id: i64, times: String },
    Slot { slot_id: i64 },
}

impl CallbackToken {
    /// Parse raw callback data
    pub fn parse(raw: &str) -> Result<Self> {
        if raw == "cancel" {
            return Ok(CallbackToken::Cancel);
        }

        let mut parts = raw.splitn(4, ':');
        let kind = parts.next().unwrap_or_default();
        let id = parts
            .next()
            .ok_or_else(|| BookingError::malformed(format!("token without id: {}", raw)))
            .and_then(parse_id)?;
        let tag = parts.next();
        let payload = parts.next();

        match (kind, tag, payload) {
            ("fair_id", None, None) => Ok(CallbackToken::Fair { fair_id: id }),
            ("fair_id", Some("name"), Some(name)) => Ok(CallbackToken::FairWithName {
                fair_id: id,
                name: name.to_string(),
            }),
            ("event_id", None, None) => Ok(CallbackToken::Event { event_id: id }),
            ("event_id", Some("day"), Some(day)) => Ok(CallbackToken::EventDay {
                event_id: id,
                day: parse_date(day)?,
            }),
            ("event_id", Some("des"), Some(description)) => Ok(CallbackToken::EventWithDescription {
                event_id: id,
                description: description.to_string(),
            }),
            ("event_id", Some("time"), Some(times)) => Ok(CallbackToken::EventWithTimes {
                event_id: id,
                times: times.to_string(),
            }),
            ("slot_id", None, None) => Ok(CallbackToken::Slot { slot_id: id }),
            _ => Err(BookingError::malformed(format!("unrecognized token: {}", raw))),
        }
    }

    /// Encode the token as callback data
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackToken::Cancel => write!(f, "cancel"),
            CallbackToken::Fair { fair_id } => write!(f, "fair_id:{}", fair_id),
            CallbackToken::FairWithName { fair_id, name } => write!(f, "fair_id:{}:name:{}", fair_id, name),
            CallbackToken::Event { event_id } => write!(f, "event_id:{}", event_id),
            CallbackToken::EventDay { event_id, day } => {
                write!(f, "event_id:{}:day:{}", event_id, format_date(*day))
            }
            CallbackToken::EventWithDescription { event_id, description } => {
                write!(f, "event_id:{}:des:{}", event_id, description)
            }
            CallbackToken::EventWithTimes { event_id, times } => {
                write!(f, "event_id:{}:time:{}", event_id, times)
            }
            CallbackToken::Slot { slot_id } => write!(f, "slot_id:{}", slot_id),
        }
    }
}

/// Ids are positive decimal integers without sign or padding tricks
fn parse_id(raw: &str) -> Result<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BookingError::malformed(format!("invalid id: '{}'", raw)));
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(BookingError::malformed(format!("invalid id: '{}'", raw))),
    }
}
