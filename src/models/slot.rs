//! Slot model

use serde::{Deserialize, Serialize};
use chrono::{NaiveDateTime, NaiveTime};
use sqlx::FromRow;

/// A single bookable interval with capacity one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Slot {
    pub id: i64,
    pub event_id: i64,
    pub holder_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.holder_id.is_none()
    }
}

/// A slot held by a user, joined with its event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookedSlot {
    pub slot_id: i64,
    pub event_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub event_name: String,
    pub event_description: String,
}

/// A slot of an event, joined with its holder when booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EventSlot {
    pub slot_id: i64,
    pub holder_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub holder_name: Option<String>,
    pub holder_handle: Option<String>,
}

/// A free slot on a given day, clock times only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeTime {
    pub slot_id: i64,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Availability {
    pub free: i64,
    pub total: i64,
}

impl Availability {
    pub fn new(free: i64, total: i64) -> Self {
        Self { free, total }
    }

    pub fn has_slots(&self) -> bool {
        self.total > 0
    }

    pub fn is_fully_booked(&self) -> bool {
        self.total > 0 && self.free == 0
    }
}

/// Result of releasing a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The slot had a holder and is now free
    Released(Slot),
    /// The slot was already free; nothing changed
    AlreadyFree(Slot),
}

impl ReleaseOutcome {
    pub fn slot(&self) -> &Slot {
        match self {
            ReleaseOutcome::Released(slot) => slot,
            ReleaseOutcome::AlreadyFree(slot) => slot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub event_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}
