//! Event model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use super::slot::Availability;
use super::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub fair_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub fair_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
}

/// An event together with its owner and current availability
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub event: Event,
    /// Absent when the owner row was removed behind the bot's back
    pub owner: Option<User>,
    pub availability: Availability,
}
