//! User repository implementation

use sqlx::SqlitePool;
use crate::models::user::{User, UpsertUserRequest};
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the user or refresh its display metadata
    pub async fn upsert(&self, request: UpsertUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, display_name, handle)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                display_name = excluded.display_name,
                handle = excluded.handle
            RETURNING id, display_name, handle
            "#
        )
        .bind(request.id)
        .bind(request.display_name)
        .bind(request.handle)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, display_name, handle FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
