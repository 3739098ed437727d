//! Error handling for FairBooking
//!
//! This module defines the main error type used throughout the application.
//! Domain outcomes (`NotFound`, `SlotUnavailable`, `InvalidRange`, `Conflict`,
//! `MalformedInput`) are typed variants so callers can match on them instead
//! of inspecting messages.

use std::fmt;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Record kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Fair,
    Event,
    Slot,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => write!(f, "user"),
            Entity::Fair => write!(f, "fair"),
            Entity::Event => write!(f, "event"),
            Entity::Slot => write!(f, "slot"),
        }
    }
}

/// Main error type for FairBooking application
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: i64 },

    #[error("Slot {slot_id} is not available")]
    SlotUnavailable { slot_id: i64 },

    #[error("Invalid time range: {start} is not before {end}")]
    InvalidRange { start: NaiveDateTime, end: NaiveDateTime },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Result type alias for FairBooking operations
pub type Result<T> = std::result::Result<T, BookingError>;

impl BookingError {
    /// Shorthand for a missing record
    pub fn not_found(entity: Entity, id: i64) -> Self {
        BookingError::NotFound { entity, id }
    }

    /// Shorthand for input that fails a grammar
    pub fn malformed(message: impl Into<String>) -> Self {
        BookingError::MalformedInput(message.into())
    }

    /// Whether the error is an expected domain outcome rather than an infrastructure failure
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            BookingError::NotFound { .. }
                | BookingError::SlotUnavailable { .. }
                | BookingError::InvalidRange { .. }
                | BookingError::Conflict(_)
                | BookingError::MalformedInput(_)
        )
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BookingError::Database(_) => false,
            BookingError::Migration(_) => false,
            BookingError::Telegram(_) => true,
            BookingError::Redis(_) => true,
            BookingError::Serialization(_) => false,
            BookingError::Io(_) => true,
            BookingError::Config(_) => false,
            BookingError::ConfigLoad(_) => false,
            BookingError::NotFound { .. } => true,
            BookingError::SlotUnavailable { .. } => true,
            BookingError::InvalidRange { .. } => true,
            BookingError::Conflict(_) => true,
            BookingError::MalformedInput(_) => true,
            BookingError::InvalidStateTransition { .. } => false,
            BookingError::PermissionDenied(_) => true,
            BookingError::RateLimitExceeded => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BookingError::Database(_) => ErrorSeverity::Critical,
            BookingError::Migration(_) => ErrorSeverity::Critical,
            BookingError::Config(_) | BookingError::ConfigLoad(_) => ErrorSeverity::Critical,
            BookingError::PermissionDenied(_) => ErrorSeverity::Warning,
            BookingError::RateLimitExceeded => ErrorSeverity::Warning,
            BookingError::NotFound { .. } | BookingError::Conflict(_) => ErrorSeverity::Warning,
            BookingError::SlotUnavailable { .. }
            | BookingError::InvalidRange { .. }
            | BookingError::MalformedInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
