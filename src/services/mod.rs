//! Services module
//!
//! This module contains business logic services

pub mod booking;
pub mod catalog;
pub mod user;

// Re-export commonly used services
pub use booking::BookingService;
pub use catalog::CatalogService;
pub use user::UserService;

use crate::database::{health_check, DatabaseService};

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub booking_service: BookingService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one database service
    pub fn new(database: DatabaseService) -> Self {
        Self {
            user_service: UserService::new(database.users.clone()),
            catalog_service: CatalogService::new(database.clone()),
            booking_service: BookingService::new(database.clone()),
            database,
        }
    }

    /// Health check for the services' backing store
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = health_check(self.database.pool()).await.is_ok();

        ServiceHealthStatus { database_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }

        issues
    }
}
