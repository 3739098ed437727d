//! Event repository implementation

use sqlx::SqlitePool;
use crate::models::event::{Event, CreateEventRequest};
use crate::utils::errors::{BookingError, Entity, Result};

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (fair_id, owner_id, name, description)
            VALUES (?, ?, ?, ?)
            RETURNING id, fair_id, owner_id, name, description
            "#
        )
        .bind(request.fair_id)
        .bind(request.owner_id)
        .bind(request.name)
        .bind(request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, fair_id, owner_id, name, description FROM events WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Events of a fair ordered by name
    pub async fn list_by_fair(&self, fair_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, fair_id, owner_id, name, description FROM events WHERE fair_id = ? ORDER BY name ASC, id ASC"
        )
        .bind(fair_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events owned by a user ordered by name
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, fair_id, owner_id, name, description FROM events WHERE owner_id = ? ORDER BY name ASC, id ASC"
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Replace the description; `None` when the event does not exist
    pub async fn update_description(&self, id: i64, description: &str) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET description = ?
            WHERE id = ?
            RETURNING id, fair_id, owner_id, name, description
            "#
        )
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete an event inside one transaction.
    ///
    /// With `cascade` the event's slots go first; without it an event that
    /// still has slots is left alone and `Conflict` is returned. Returns the
    /// number of slots removed.
    pub async fn delete(&self, id: i64, cascade: bool) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(BookingError::not_found(Entity::Event, id));
        }

        let removed_slots = if cascade {
            sqlx::query("DELETE FROM slots WHERE event_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            let slot_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM slots WHERE event_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            if slot_count > 0 {
                return Err(BookingError::Conflict(format!(
                    "event {} still has {} slot(s)", id, slot_count
                )));
            }
            0
        };

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed_slots)
    }
}
