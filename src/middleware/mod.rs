//! Middleware module
//!
//! This module contains middleware for request processing

pub mod rate_limit;

pub use rate_limit::RateLimitMiddleware;
