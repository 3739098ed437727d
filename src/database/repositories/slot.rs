//! Slot repository implementation

use chrono::NaiveDate;
use sqlx::SqlitePool;
use crate::models::slot::{Slot, BookedSlot, EventSlot, Availability, CreateSlotRequest};
use crate::utils::errors::Result;
use crate::utils::helpers::{format_date, parse_date};

#[derive(Clone, Debug)]
pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new free slot
    pub async fn create(&self, request: CreateSlotRequest) -> Result<Slot> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            INSERT INTO slots (event_id, holder_id, start_time, end_time)
            VALUES (?, NULL, ?, ?)
            RETURNING id, event_id, holder_id, start_time, end_time
            "#
        )
        .bind(request.event_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Find slot by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            "SELECT id, event_id, holder_id, start_time, end_time FROM slots WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Delete slot regardless of its holder. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM slots WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Assign the holder only if the slot is currently free.
    ///
    /// `None` means the slot is held by someone or does not exist.
    pub async fn reserve(&self, id: i64, holder_id: i64) -> Result<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET holder_id = ?
            WHERE id = ? AND holder_id IS NULL
            RETURNING id, event_id, holder_id, start_time, end_time
            "#
        )
        .bind(holder_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Clear the holder of a booked slot.
    ///
    /// `None` means the slot was already free or does not exist.
    pub async fn release(&self, id: i64) -> Result<Option<Slot>> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET holder_id = NULL
            WHERE id = ? AND holder_id IS NOT NULL
            RETURNING id, event_id, holder_id, start_time, end_time
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Free and total slot counts of an event in one statement
    pub async fn availability(&self, event_id: i64) -> Result<Availability> {
        let (total, free): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN holder_id IS NULL THEN 1 ELSE 0 END), 0)
            FROM slots
            WHERE event_id = ?
            "#
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Availability::new(free, total))
    }

    /// Distinct days that still have a free slot, ascending
    pub async fn free_dates(&self, event_id: i64) -> Result<Vec<NaiveDate>> {
        let days: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT DATE(start_time)
            FROM slots
            WHERE event_id = ? AND holder_id IS NULL
            ORDER BY 1 ASC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        days.iter().map(|day| parse_date(day)).collect()
    }

    /// Free slots of an event on one day, ascending by start
    pub async fn free_on_date(&self, event_id: i64, day: NaiveDate) -> Result<Vec<Slot>> {
        let slots = sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, event_id, holder_id, start_time, end_time
            FROM slots
            WHERE event_id = ? AND holder_id IS NULL AND DATE(start_time) = ?
            ORDER BY start_time ASC, id ASC
            "#
        )
        .bind(event_id)
        .bind(format_date(day))
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Slots held by a user, ordered by event name then start
    pub async fn booked_by(&self, holder_id: i64) -> Result<Vec<BookedSlot>> {
        let slots = sqlx::query_as::<_, BookedSlot>(
            r#"
            SELECT s.id AS slot_id, s.event_id, s.start_time, s.end_time,
                   e.name AS event_name, e.description AS event_description
            FROM slots s
            JOIN events e ON e.id = s.event_id
            WHERE s.holder_id = ?
            ORDER BY e.name ASC, s.start_time ASC
            "#
        )
        .bind(holder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Every slot of an event with its holder, ordered by start then holder name
    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<EventSlot>> {
        let slots = sqlx::query_as::<_, EventSlot>(
            r#"
            SELECT s.id AS slot_id, s.holder_id, s.start_time, s.end_time,
                   u.display_name AS holder_name, u.handle AS holder_handle
            FROM slots s
            LEFT JOIN users u ON u.id = s.holder_id
            WHERE s.event_id = ?
            ORDER BY s.start_time ASC, u.display_name ASC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }
}
