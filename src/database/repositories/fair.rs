//! Fair repository implementation

use sqlx::SqlitePool;
use crate::models::fair::{Fair, CreateFairRequest, UpdateFairRequest};
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct FairRepository {
    pool: SqlitePool,
}

impl FairRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new fair
    pub async fn create(&self, request: CreateFairRequest) -> Result<Fair> {
        let fair = sqlx::query_as::<_, Fair>(
            r#"
            INSERT INTO fairs (name, description)
            VALUES (?, ?)
            RETURNING id, name, description
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(fair)
    }

    /// Find fair by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Fair>> {
        let fair = sqlx::query_as::<_, Fair>(
            "SELECT id, name, description FROM fairs WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fair)
    }

    /// List all fairs ordered by name
    pub async fn list(&self) -> Result<Vec<Fair>> {
        let fairs = sqlx::query_as::<_, Fair>(
            "SELECT id, name, description FROM fairs ORDER BY name ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fairs)
    }

    /// Update fair fields; `None` when the fair does not exist
    pub async fn update(&self, id: i64, request: UpdateFairRequest) -> Result<Option<Fair>> {
        let fair = sqlx::query_as::<_, Fair>(
            r#"
            UPDATE fairs
            SET name = COALESCE(?, name),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING id, name, description
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fair)
    }

    /// Delete fair, leaving its events untouched. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM fairs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
