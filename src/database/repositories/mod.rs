//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod fair;
pub mod event;
pub mod slot;

// Re-export repositories
pub use user::UserRepository;
pub use fair::FairRepository;
pub use event::EventRepository;
pub use slot::SlotRepository;
