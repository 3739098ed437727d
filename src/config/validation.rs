//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BookingError, Result};
use super::{DialogueConfig, Settings, StateBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_dialogue_config(settings)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(BookingError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_ids.iter().any(|id| *id <= 0) {
        return Err(BookingError::Config(
            "Admin ids must be positive chat ids".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BookingError::Config(
            "Database URL is required".to_string()
        ));
    }

    if !config.url.starts_with("sqlite:") {
        return Err(BookingError::Config(
            format!("Unsupported database URL: {} (expected sqlite:...)", config.url)
        ));
    }

    if config.max_connections == 0 {
        return Err(BookingError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(BookingError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate dialogue configuration and the Redis section it may require
fn validate_dialogue_config(settings: &Settings) -> Result<()> {
    if settings.dialogue.conversation_ttl_seconds == 0 {
        return Err(BookingError::Config(
            "Conversation TTL must be greater than 0".to_string()
        ));
    }

    if settings.dialogue.conversation_ttl_seconds > DialogueConfig::MAX_TTL_SECONDS {
        return Err(BookingError::Config(format!(
            "Conversation TTL cannot exceed {} seconds",
            DialogueConfig::MAX_TTL_SECONDS
        )));
    }

    if settings.dialogue.backend == StateBackend::Redis {
        match &settings.redis {
            Some(redis) if !redis.url.is_empty() => {}
            _ => {
                return Err(BookingError::Config(
                    "Redis URL is required for the redis state backend".to_string()
                ));
            }
        }
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.requests_per_minute == 0 {
        return Err(BookingError::Config(
            "Rate limit must allow at least one request per minute".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BookingError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BookingError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
