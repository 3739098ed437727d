//! Rate limiting middleware
//!
//! Per-user limiter applied before updates reach the dialogue engine, so a
//! single chat cannot flood the store with requests.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use tracing::{debug, warn};
use crate::config::RateLimitConfig;
use crate::utils::errors::{BookingError, Result};

type KeyedLimiter = RateLimiter<i64, DefaultKeyedStateStore<i64>, DefaultClock>;

/// Rate limiting middleware
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<KeyedLimiter>,
    admin_exempt: bool,
    admin_ids: Arc<HashSet<i64>>,
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance
    pub fn new(config: &RateLimitConfig, admin_ids: &[i64]) -> Result<Self> {
        let per_minute = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            BookingError::Config("Rate limit must allow at least one request per minute".to_string())
        })?;
        let burst = NonZeroU32::new(config.burst).unwrap_or(per_minute);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            admin_exempt: config.admin_exempt,
            admin_ids: Arc::new(admin_ids.iter().copied().collect()),
        })
    }

    /// Check if user is rate limited
    pub fn check_rate_limit(&self, user_id: i64) -> Result<()> {
        if self.admin_exempt && self.admin_ids.contains(&user_id) {
            debug!(user_id = user_id, "Admin user exempt from rate limiting");
            return Ok(());
        }

        self.limiter.check_key(&user_id).map_err(|_| {
            warn!(user_id = user_id, "Rate limit exceeded");
            BookingError::RateLimitExceeded
        })
    }

    /// Drop state of users whose quota has fully replenished
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of users currently tracked
    pub fn tracked_users(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for RateLimitMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitMiddleware")
            .field("admin_exempt", &self.admin_exempt)
            .field("admin_ids", &self.admin_ids)
            .finish_non_exhaustive()
    }
}
