//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod fair;
pub mod event;
pub mod slot;

// Re-export commonly used models
pub use user::{User, UpsertUserRequest};
pub use fair::{Fair, CreateFairRequest, UpdateFairRequest};
pub use event::{Event, EventDetails, CreateEventRequest};
pub use slot::{Slot, BookedSlot, EventSlot, FreeTime, Availability, ReleaseOutcome, CreateSlotRequest};
