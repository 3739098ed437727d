//! Integration test scenarios
//!
//! Complete journeys that cross several commands and users.

pub mod booking_journey_test;
