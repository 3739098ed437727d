//! Catalog service: fairs and events
//!
//! Listing, creation and removal of fairs and of the events published under
//! them. Reference checks happen here since the store does not enforce them.

use tracing::{debug, info};
use crate::database::DatabaseService;
use crate::models::{
    CreateEventRequest, CreateFairRequest, Event, EventDetails, Fair, UpdateFairRequest,
    UpsertUserRequest,
};
use crate::utils::errors::{BookingError, Entity, Result};
use crate::utils::logging::{log_admin_action, log_event_action};

#[derive(Clone, Debug)]
pub struct CatalogService {
    db: DatabaseService,
}

impl CatalogService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// All fairs ordered by name
    pub async fn list_fairs(&self) -> Result<Vec<Fair>> {
        self.db.fairs.list().await
    }

    pub async fn get_fair(&self, fair_id: i64) -> Result<Fair> {
        self.db.fairs.find_by_id(fair_id).await?
            .ok_or_else(|| BookingError::not_found(Entity::Fair, fair_id))
    }

    pub async fn create_fair(&self, admin_id: i64, name: &str, description: &str) -> Result<Fair> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BookingError::malformed("fair name cannot be empty"));
        }

        let fair = self.db.fairs.create(CreateFairRequest {
            name: name.to_string(),
            description: description.trim().to_string(),
        }).await?;

        log_admin_action(admin_id, "create_fair", Some(&fair.name));
        Ok(fair)
    }

    pub async fn update_fair(&self, fair_id: i64, request: UpdateFairRequest) -> Result<Fair> {
        self.db.fairs.update(fair_id, request).await?
            .ok_or_else(|| BookingError::not_found(Entity::Fair, fair_id))
    }

    /// Delete a fair. Its events are kept and become orphaned.
    pub async fn delete_fair(&self, admin_id: i64, fair_id: i64) -> Result<Fair> {
        let fair = self.get_fair(fair_id).await?;
        if !self.db.fairs.delete(fair_id).await? {
            return Err(BookingError::not_found(Entity::Fair, fair_id));
        }

        log_admin_action(admin_id, "delete_fair", Some(&fair.name));
        Ok(fair)
    }

    /// Events of a fair ordered by name
    pub async fn list_events(&self, fair_id: i64) -> Result<Vec<Event>> {
        self.db.events.list_by_fair(fair_id).await
    }

    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.db.events.find_by_id(event_id).await?
            .ok_or_else(|| BookingError::not_found(Entity::Event, event_id))
    }

    /// Event together with its owner and current availability
    pub async fn event_details(&self, event_id: i64) -> Result<EventDetails> {
        let event = self.get_event(event_id).await?;
        let owner = self.db.users.find_by_id(event.owner_id).await?;
        let availability = self.db.slots.availability(event_id).await?;

        Ok(EventDetails { event, owner, availability })
    }

    /// Publish an event under an existing fair, upserting the owner
    pub async fn create_event(
        &self,
        fair_id: i64,
        owner: UpsertUserRequest,
        name: &str,
        description: &str,
    ) -> Result<Event> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BookingError::malformed("event name cannot be empty"));
        }

        self.get_fair(fair_id).await?;
        let owner = self.db.users.upsert(owner).await?;

        let event = self.db.events.create(CreateEventRequest {
            fair_id,
            owner_id: owner.id,
            name: name.to_string(),
            description: description.to_string(),
        }).await?;

        log_event_action(event.id, "create", owner.id, Some(&event.name));
        Ok(event)
    }

    pub async fn update_event_description(&self, event_id: i64, description: &str) -> Result<Event> {
        let event = self.db.events.update_description(event_id, description).await?
            .ok_or_else(|| BookingError::not_found(Entity::Event, event_id))?;

        log_event_action(event.id, "update_description", event.owner_id, None);
        Ok(event)
    }

    /// Delete an event; see [`crate::database::EventRepository::delete`]
    pub async fn delete_event(&self, event_id: i64, cascade: bool) -> Result<Event> {
        let event = self.get_event(event_id).await?;
        let removed = self.db.events.delete(event_id, cascade).await?;

        info!(event_id = event_id, removed_slots = removed, "Event deleted");
        log_event_action(event_id, "delete", event.owner_id, Some(&event.name));
        Ok(event)
    }

    /// Events owned by a user ordered by name
    pub async fn events_owned_by(&self, user_id: i64) -> Result<Vec<Event>> {
        debug!(user_id = user_id, "Listing owned events");
        self.db.events.list_by_owner(user_id).await
    }
}
