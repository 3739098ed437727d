//! User model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat participant, keyed by the chat id supplied by Telegram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub handle: String,
}

/// Identity and display metadata refreshed on every booking or publishing action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertUserRequest {
    pub id: i64,
    pub display_name: String,
    pub handle: String,
}

impl UpsertUserRequest {
    pub fn new(id: i64, display_name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            handle: handle.into(),
        }
    }
}
