//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    pub redis: Option<RedisConfig>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Chat ids allowed to create and delete fairs
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Where open conversations are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    Memory,
    Redis,
}

/// Dialogue engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogueConfig {
    pub backend: StateBackend,
    /// Lifetime of an open conversation without user input
    pub conversation_ttl_seconds: u64,
}

impl DialogueConfig {
    /// Longest accepted conversation lifetime, one year
    pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

    /// Conversation lifetime, capped at [`Self::MAX_TTL_SECONDS`]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.conversation_ttl_seconds.min(Self::MAX_TTL_SECONDS) as i64)
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::Memory,
            conversation_ttl_seconds: 3600,
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
}

/// Per-user inbound rate limit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub burst: u32,
    pub admin_exempt: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 30,
            burst: 10,
            admin_exempt: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when absent
    pub directory: Option<String>,
    /// Emit stdout records as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Environment variables use the `FAIRBOOKING` prefix and `__` as the
    /// section separator, e.g. `FAIRBOOKING_BOT__TOKEN`.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .set_default("database.min_connections", defaults.database.min_connections)?
            .set_default("logging.level", defaults.logging.level)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FAIRBOOKING")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BookingError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_ids: vec![],
            },
            database: DatabaseConfig {
                url: "sqlite://fairbooking.db".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
            dialogue: DialogueConfig::default(),
            redis: None,
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
        }
    }
}
