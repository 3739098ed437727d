//! User service implementation
//!
//! Users are never registered explicitly: every booking or publishing action
//! upserts the caller so display name and handle stay current.

use tracing::debug;
use crate::database::repositories::UserRepository;
use crate::models::user::{User, UpsertUserRequest};
use crate::utils::errors::Result;

/// User service for managing user operations
#[derive(Clone, Debug)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Insert the user or refresh its display metadata
    pub async fn upsert(&self, request: UpsertUserRequest) -> Result<User> {
        debug!(user_id = request.id, "Upserting user");
        self.user_repository.upsert(request).await
    }

    /// Get user by chat ID
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        debug!(user_id = user_id, "Getting user by ID");
        self.user_repository.find_by_id(user_id).await
    }
}
