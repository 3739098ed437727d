//! Test helpers module
//!
//! Utilities for testing FairBooking: a throwaway SQLite database per test
//! and a context that drives the dialogue engine like a chat would.

pub mod database_helper;
pub mod test_context;

pub use database_helper::*;
pub use test_context::*;
