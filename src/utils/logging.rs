//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the FairBooking application.

use tracing::{info, warn, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::config::LoggingConfig;
use crate::utils::errors::{BookingError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer and must live as long as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| BookingError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(config.json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout)))
        .with((!config.json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stdout)));

    let guard = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "fairbooking.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .try_init()
                .map_err(|e| BookingError::Config(format!("Logging already initialized: {}", e)))?;
            Some(guard)
        }
        None => {
            registry
                .try_init()
                .map_err(|e| BookingError::Config(format!("Logging already initialized: {}", e)))?;
            None
        }
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log slot booking changes
pub fn log_booking_action(slot_id: i64, action: &str, user_id: Option<i64>) {
    info!(
        slot_id = slot_id,
        action = action,
        user_id = user_id,
        "Booking action performed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log a listing that no longer matches the store.
///
/// Raised when a record the dialogue itself offered is missing or blocked by
/// the time the user picks it.
pub fn log_stale_listing(user_id: i64, command: &str, error: &BookingError) {
    error!(
        user_id = user_id,
        command = command,
        error = %error,
        "Listed record changed before it was used"
    );
}
