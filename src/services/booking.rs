//! Booking service: slots, availability and reservations

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use crate::database::DatabaseService;
use crate::models::{
    Availability, BookedSlot, CreateSlotRequest, EventSlot, FreeTime, ReleaseOutcome, Slot,
    UpsertUserRequest,
};
use crate::utils::errors::{BookingError, Entity, Result};
use crate::utils::logging::log_booking_action;

#[derive(Clone, Debug)]
pub struct BookingService {
    db: DatabaseService,
}

impl BookingService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Free and total slot counts; both zero for an event without slots
    pub async fn availability(&self, event_id: i64) -> Result<Availability> {
        self.db.slots.availability(event_id).await
    }

    /// Distinct days with at least one free slot, ascending
    pub async fn free_dates(&self, event_id: i64) -> Result<Vec<NaiveDate>> {
        self.db.slots.free_dates(event_id).await
    }

    /// Free slots on a day, ascending by start, as clock times
    pub async fn free_times(&self, event_id: i64, day: NaiveDate) -> Result<Vec<FreeTime>> {
        let slots = self.db.slots.free_on_date(event_id, day).await?;

        Ok(slots
            .into_iter()
            .map(|slot| FreeTime {
                slot_id: slot.id,
                start: slot.start_time.time(),
                end: slot.end_time.time(),
            })
            .collect())
    }

    pub async fn get_slot(&self, slot_id: i64) -> Result<Slot> {
        self.db.slots.find_by_id(slot_id).await?
            .ok_or_else(|| BookingError::not_found(Entity::Slot, slot_id))
    }

    /// Reserve a free slot for the user.
    ///
    /// The holder is set by a single conditional update, so of two concurrent
    /// callers exactly one wins. Held or missing slots give `SlotUnavailable`.
    pub async fn reserve_slot(&self, slot_id: i64, user: UpsertUserRequest) -> Result<Slot> {
        let user = self.db.users.upsert(user).await?;

        match self.db.slots.reserve(slot_id, user.id).await? {
            Some(slot) => {
                log_booking_action(slot_id, "reserve", Some(user.id));
                Ok(slot)
            }
            None => {
                debug!(slot_id = slot_id, user_id = user.id, "Reservation lost");
                Err(BookingError::SlotUnavailable { slot_id })
            }
        }
    }

    /// Release a slot whoever holds it
    pub async fn release_slot(&self, slot_id: i64) -> Result<ReleaseOutcome> {
        if let Some(slot) = self.db.slots.release(slot_id).await? {
            log_booking_action(slot_id, "release", None);
            return Ok(ReleaseOutcome::Released(slot));
        }

        let slot = self.get_slot(slot_id).await?;
        Ok(ReleaseOutcome::AlreadyFree(slot))
    }

    /// Add a free slot to an event. Overlapping slots are allowed.
    pub async fn create_slot(&self, event_id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Result<Slot> {
        if start >= end {
            return Err(BookingError::InvalidRange { start, end });
        }

        if self.db.events.find_by_id(event_id).await?.is_none() {
            return Err(BookingError::not_found(Entity::Event, event_id));
        }

        let slot = self.db.slots.create(CreateSlotRequest {
            event_id,
            start_time: start,
            end_time: end,
        }).await?;

        info!(slot_id = slot.id, event_id = event_id, "Slot created");
        Ok(slot)
    }

    /// Delete a slot even if booked; the holder loses the booking
    pub async fn delete_slot(&self, slot_id: i64) -> Result<Slot> {
        let slot = self.get_slot(slot_id).await?;
        if !self.db.slots.delete(slot_id).await? {
            return Err(BookingError::not_found(Entity::Slot, slot_id));
        }

        log_booking_action(slot_id, "delete", slot.holder_id);
        Ok(slot)
    }

    /// Slots held by the user, ordered by event name then start
    pub async fn slots_booked_by(&self, user_id: i64) -> Result<Vec<BookedSlot>> {
        self.db.slots.booked_by(user_id).await
    }

    /// All slots of an event with holders, ordered by start then holder name
    pub async fn slots_of_event(&self, event_id: i64) -> Result<Vec<EventSlot>> {
        self.db.slots.list_by_event(event_id).await
    }
}
