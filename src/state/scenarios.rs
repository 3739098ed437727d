//! Conversation scenarios implementation
//!
//! Entry prompts and step handlers of every conversation command. Each
//! handler returns an [`Outcome`]; the engine stores or closes the
//! conversation accordingly and maps domain errors to replies.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use crate::models::{Availability, Event, ReleaseOutcome};
use crate::utils::errors::{BookingError, Result};
use crate::utils::helpers::{format_clock, format_date, format_datetime, normalize_whitespace, parse_slot_times};
use super::callback::{CallbackToken, MAX_TOKEN_BYTES};
use super::context::{ConversationCommand, ConversationContext, ConversationStep};
use super::dialogue::{DialogueEngine, Outcome, Reply, UserIdentity};
use super::messages;

use super::callback::CallbackToken as T;
use super::context::ConversationCommand as C;
use super::context::ConversationStep as S;

impl DialogueEngine {
    /// First prompt of a conversation
    pub(super) async fn enter(&self, user: &UserIdentity, command: ConversationCommand) -> Result<Outcome> {
        match command {
            C::Fairs | C::Events | C::Book => self.offer_fairs(messages::SELECT_FAIR).await,
            C::DeleteFair => self.offer_fairs(messages::SELECT_FAIR_TO_DELETE).await,
            C::Unbook => self.offer_bookings(user).await,
            C::Publish => Ok(ask(S::AwaitEventName, messages::ASK_EVENT_NAME)),
            C::ChangeDes => Ok(ask(S::AwaitDescription, messages::ASK_EVENT_DESCRIPTION)),
            C::NewSlot => Ok(ask(S::AwaitSlotTimes, messages::ASK_SLOT_TIMES)),
            C::NewFair => Ok(ask(S::AwaitFairName, messages::ASK_FAIR_NAME)),
            C::DeleteSlot | C::DeleteEvent | C::MyEvents => self.offer_own_events(user).await,
        }
    }

    /// Handle a parsed selection in the current step
    pub(super) async fn on_selection(
        &self,
        context: &ConversationContext,
        user: &UserIdentity,
        token: CallbackToken,
    ) -> Result<Outcome> {
        match (context.command, &context.step, token) {
            (C::Fairs, S::ChooseFair, T::Fair { fair_id }) => self.show_fair(fair_id).await,
            (C::Events | C::Book, S::ChooseFair, T::Fair { fair_id }) => self.offer_events(fair_id).await,
            (C::Events, S::ChooseEvent { fair_id }, T::Event { event_id }) => {
                self.show_event(*fair_id, event_id).await
            }
            (C::Book, S::ChooseEvent { fair_id }, T::Event { event_id }) => {
                self.offer_free_days(*fair_id, event_id).await
            }
            (C::Book, S::ChooseDay { event_id }, T::EventDay { event_id: picked, day }) if picked == *event_id => {
                self.offer_free_times(picked, day).await
            }
            (C::Book, S::ChooseTime { event_id }, T::Slot { slot_id }) => {
                self.reserve(user, *event_id, slot_id).await
            }
            (C::Unbook, S::ChooseBooking, T::Slot { slot_id }) => self.confirm_unbook(user, slot_id).await,
            (C::Unbook, S::ConfirmUnbook { slot_id }, T::Slot { slot_id: picked }) if picked == *slot_id => {
                self.unbook(user, picked).await
            }
            (C::Publish, S::ChooseFairForEvent, T::FairWithName { fair_id, name }) => {
                self.publish(user, fair_id, &name).await
            }
            (C::ChangeDes, S::ChooseEventForDescription, T::EventWithDescription { event_id, description }) => {
                self.change_description(user, event_id, &description).await
            }
            (C::NewSlot, S::ChooseEventForSlot, T::EventWithTimes { event_id, times }) => {
                self.create_slot(user, event_id, &times).await
            }
            (C::DeleteSlot, S::ChooseOwnEvent, T::Event { event_id }) => {
                self.offer_slots_for_deletion(user, event_id).await
            }
            (C::DeleteSlot, S::ChooseSlot { event_id }, T::Slot { slot_id }) => {
                self.confirm_slot_deletion(user, *event_id, slot_id).await
            }
            (C::DeleteSlot, S::ConfirmSlotDeletion { event_id, slot_id }, T::Slot { slot_id: picked })
                if picked == *slot_id =>
            {
                self.delete_slot(user, *event_id, picked).await
            }
            (C::DeleteEvent, S::ChooseOwnEvent, T::Event { event_id }) => {
                self.confirm_event_deletion(user, event_id).await
            }
            (C::DeleteEvent, S::ConfirmEventDeletion { event_id }, T::Event { event_id: picked })
                if picked == *event_id =>
            {
                self.delete_event(user, picked).await
            }
            (C::MyEvents, S::ChooseOwnEvent, T::Event { event_id }) => self.show_own_event(user, event_id).await,
            (C::DeleteFair, S::ChooseFair, T::Fair { fair_id }) => self.confirm_fair_deletion(user, fair_id).await,
            (C::DeleteFair, S::ConfirmFairDeletion { fair_id }, T::Fair { fair_id: picked }) if picked == *fair_id => {
                self.delete_fair(user, picked).await
            }
            (command, step, token) => Err(BookingError::malformed(format!(
                "{} does not accept '{}' at {}",
                command,
                token,
                step.label()
            ))),
        }
    }

    /// Handle free text in a step that waits for it
    pub(super) async fn on_text(
        &self,
        context: &ConversationContext,
        user: &UserIdentity,
        text: &str,
    ) -> Result<Outcome> {
        match (context.command, &context.step) {
            (C::Publish, S::AwaitEventName) => self.offer_fairs_for_event(text).await,
            (C::ChangeDes, S::AwaitDescription) => self.offer_events_for_description(user, text).await,
            (C::NewSlot, S::AwaitSlotTimes) => self.offer_events_for_slot(user, text).await,
            (C::NewFair, S::AwaitFairName) => {
                let name = normalize_whitespace(text);
                if name.is_empty() {
                    return Ok(finish(messages::EMPTY_TEXT));
                }
                Ok(ask(S::AwaitFairDescription { name }, messages::ASK_FAIR_DESCRIPTION))
            }
            (C::NewFair, S::AwaitFairDescription { name }) => self.create_fair(user, name, text).await,
            (command, step) => Err(BookingError::malformed(format!(
                "{} does not accept text at {}",
                command,
                step.label()
            ))),
        }
    }

    // Browsing

    async fn offer_fairs(&self, prompt: &str) -> Result<Outcome> {
        let fairs = self.services.catalog_service.list_fairs().await?;
        if fairs.is_empty() {
            return Ok(finish(messages::NO_FAIRS));
        }

        let options: Vec<_> = fairs
            .into_iter()
            .map(|fair| (fair.name, T::Fair { fair_id: fair.id }))
            .collect();
        Ok(Outcome::Continue(S::ChooseFair, Reply::options(prompt, options)))
    }

    async fn show_fair(&self, fair_id: i64) -> Result<Outcome> {
        let fair = self.services.catalog_service.get_fair(fair_id).await?;
        Ok(finish(format!("{}:\n\n{}", fair.name, fair.description)))
    }

    async fn offer_events(&self, fair_id: i64) -> Result<Outcome> {
        let fair = self.services.catalog_service.get_fair(fair_id).await?;
        let events = self.services.catalog_service.list_events(fair.id).await?;
        if events.is_empty() {
            return Ok(finish(messages::NO_EVENTS_IN_FAIR));
        }

        Ok(Outcome::Continue(
            S::ChooseEvent { fair_id },
            Reply::options(messages::SELECT_EVENT, event_options(events)),
        ))
    }

    async fn show_event(&self, fair_id: i64, event_id: i64) -> Result<Outcome> {
        let details = self.services.catalog_service.event_details(event_id).await?;
        if details.event.fair_id != fair_id {
            return Err(BookingError::malformed(format!("event {} is not in fair {}", event_id, fair_id)));
        }

        let (owner_name, owner_handle) = details
            .owner
            .map(|owner| (owner.display_name, owner.handle))
            .unwrap_or_default();

        Ok(finish(format!(
            "Event Details\n\nName: {}\n\nDescription: {}\n\n{}\n\nOwner: {}\nOwner Contact: {}",
            details.event.name,
            details.event.description,
            availability_line(details.availability),
            owner_name,
            owner_handle
        )))
    }

    // Booking

    async fn offer_free_days(&self, fair_id: i64, event_id: i64) -> Result<Outcome> {
        let event = self.services.catalog_service.get_event(event_id).await?;
        if event.fair_id != fair_id {
            return Err(BookingError::malformed(format!("event {} is not in fair {}", event_id, fair_id)));
        }

        let availability = self.services.booking_service.availability(event_id).await?;
        if !availability.has_slots() {
            return Ok(finish(messages::NO_SLOTS_YET));
        }
        if availability.is_fully_booked() {
            return Ok(finish(messages::all_slots_booked(availability.total)));
        }

        let days = self.services.booking_service.free_dates(event_id).await?;
        if days.is_empty() {
            return Ok(finish(messages::NO_DATES));
        }

        let options: Vec<_> = days
            .into_iter()
            .map(|day| (format_date(day), T::EventDay { event_id, day }))
            .collect();
        Ok(Outcome::Continue(
            S::ChooseDay { event_id },
            Reply::options(format!("Please select a day for {}:", event.name), options),
        ))
    }

    async fn offer_free_times(&self, event_id: i64, day: NaiveDate) -> Result<Outcome> {
        let event = self.services.catalog_service.get_event(event_id).await?;
        let times = self.services.booking_service.free_times(event_id, day).await?;
        if times.is_empty() {
            return Ok(finish(messages::NO_TIMES));
        }

        let options: Vec<_> = times
            .into_iter()
            .map(|time| {
                let label = format!("{} - {}", format_clock(time.start), format_clock(time.end));
                (label, T::Slot { slot_id: time.slot_id })
            })
            .collect();
        Ok(Outcome::Continue(
            S::ChooseTime { event_id },
            Reply::options(
                format!("Please select a time for {}, {}:", event.name, format_date(day)),
                options,
            ),
        ))
    }

    async fn reserve(&self, user: &UserIdentity, event_id: i64, slot_id: i64) -> Result<Outcome> {
        let slot = self.services.booking_service.get_slot(slot_id).await?;
        if slot.event_id != event_id {
            return Err(BookingError::malformed(format!("slot {} is not in event {}", slot_id, event_id)));
        }
        let event = self.services.catalog_service.get_event(event_id).await?;

        let slot = match self.services.booking_service.reserve_slot(slot_id, user.upsert_request()).await {
            Ok(slot) => slot,
            Err(BookingError::SlotUnavailable { .. }) => {
                info!(user_id = user.id, slot_id = slot_id, "Slot taken before the reservation");
                return Ok(finish(messages::SLOT_TAKEN));
            }
            Err(e) => return Err(e),
        };

        Ok(finish(format!(
            "Booking completed successfully!\n\nDetails\nEvent: {}\nStart time: {}\nEnd time: {}\nUser: {}",
            event.name,
            format_datetime(slot.start_time),
            format_datetime(slot.end_time),
            user.display_name
        )))
    }

    async fn offer_bookings(&self, user: &UserIdentity) -> Result<Outcome> {
        let bookings = self.services.booking_service.slots_booked_by(user.id).await?;
        if bookings.is_empty() {
            return Ok(finish(messages::NO_BOOKINGS));
        }

        let options: Vec<_> = bookings
            .into_iter()
            .map(|booking| {
                let label = format!("{}: {}", booking.event_name, format_datetime(booking.start_time));
                (label, T::Slot { slot_id: booking.slot_id })
            })
            .collect();
        Ok(Outcome::Continue(S::ChooseBooking, Reply::options(messages::SELECT_BOOKING, options)))
    }

    async fn confirm_unbook(&self, user: &UserIdentity, slot_id: i64) -> Result<Outcome> {
        let slot = self.services.booking_service.get_slot(slot_id).await?;
        if slot.holder_id != Some(user.id) {
            return Err(BookingError::PermissionDenied(format!("slot {} is not held by {}", slot_id, user.id)));
        }
        let event = self.services.catalog_service.get_event(slot.event_id).await?;

        Ok(Outcome::Continue(
            S::ConfirmUnbook { slot_id },
            Reply::options(
                format!(
                    "Are you sure you want to unbook:\n{}\n{} -\n{}?",
                    event.name,
                    format_datetime(slot.start_time),
                    format_datetime(slot.end_time)
                ),
                vec![(messages::CONFIRM_UNBOOK, T::Slot { slot_id })],
            ),
        ))
    }

    async fn unbook(&self, user: &UserIdentity, slot_id: i64) -> Result<Outcome> {
        let slot = self.services.booking_service.get_slot(slot_id).await?;
        if slot.holder_id != Some(user.id) {
            return Err(BookingError::PermissionDenied(format!("slot {} is not held by {}", slot_id, user.id)));
        }
        let event = self.services.catalog_service.get_event(slot.event_id).await?;

        let outcome = self.services.booking_service.release_slot(slot_id).await?;
        if let ReleaseOutcome::AlreadyFree(_) = outcome {
            debug!(slot_id = slot_id, "Slot was already free");
        }
        let slot = outcome.slot();

        Ok(finish(format!(
            "Unbooking completed successfully!\n\nDetails\nEvent: {}\nStart time: {}\nEnd time: {}\n\
             The slot is now available",
            event.name,
            format_datetime(slot.start_time),
            format_datetime(slot.end_time)
        )))
    }

    // Publishing

    async fn offer_fairs_for_event(&self, text: &str) -> Result<Outcome> {
        let name = normalize_whitespace(text);
        if name.is_empty() {
            return Ok(finish(messages::EMPTY_TEXT));
        }

        let fairs = self.services.catalog_service.list_fairs().await?;
        if fairs.is_empty() {
            return Ok(finish(messages::NO_FAIRS_CANCELLED));
        }

        let options: Vec<_> = fairs
            .into_iter()
            .map(|fair| (fair.name, T::FairWithName { fair_id: fair.id, name: name.clone() }))
            .collect();
        Ok(carrying(&name, S::ChooseFairForEvent, Reply::options(messages::SELECT_FAIR, options)))
    }

    async fn publish(&self, user: &UserIdentity, fair_id: i64, name: &str) -> Result<Outcome> {
        let fair = self.services.catalog_service.get_fair(fair_id).await?;
        let event = self
            .services
            .catalog_service
            .create_event(fair.id, user.upsert_request(), name, "")
            .await?;

        Ok(finish(format!(
            "Event created successfully!\n\nDetails\nEvent: {}\nFair: {}\nOwner: {}",
            event.name, fair.name, user.display_name
        )))
    }

    async fn offer_events_for_description(&self, user: &UserIdentity, text: &str) -> Result<Outcome> {
        let description = text.trim().to_string();
        let events = self.services.catalog_service.events_owned_by(user.id).await?;
        if events.is_empty() {
            return Ok(finish(messages::NO_OWN_EVENTS));
        }

        let options: Vec<_> = events
            .into_iter()
            .map(|event| {
                let token = T::EventWithDescription { event_id: event.id, description: description.clone() };
                (event.name, token)
            })
            .collect();
        Ok(carrying(
            &description,
            S::ChooseEventForDescription,
            Reply::options(messages::SELECT_OWN_EVENT, options),
        ))
    }

    async fn change_description(&self, user: &UserIdentity, event_id: i64, description: &str) -> Result<Outcome> {
        self.owned_event(user, event_id).await?;
        let event = self
            .services
            .catalog_service
            .update_event_description(event_id, description)
            .await?;

        Ok(finish(format!(
            "Description updated successfully!\n\nDetails\nEvent: {}\nDescription: {}\nOwner: {}",
            event.name, event.description, user.display_name
        )))
    }

    async fn offer_events_for_slot(&self, user: &UserIdentity, text: &str) -> Result<Outcome> {
        let (start, end) = match parse_slot_times(text) {
            Ok(times) => times,
            Err(BookingError::MalformedInput(_)) => return Ok(finish(messages::BAD_SLOT_FORMAT)),
            Err(e) => return Err(e),
        };
        if start >= end {
            return Ok(finish(messages::BAD_SLOT_RANGE));
        }

        let events = self.services.catalog_service.events_owned_by(user.id).await?;
        if events.is_empty() {
            return Ok(finish(messages::NO_OWN_EVENTS));
        }

        let times = slot_times_text(start, end);
        let options: Vec<_> = events
            .into_iter()
            .map(|event| (event.name, T::EventWithTimes { event_id: event.id, times: times.clone() }))
            .collect();
        Ok(carrying(&times, S::ChooseEventForSlot, Reply::options(messages::SELECT_OWN_EVENT, options)))
    }

    async fn create_slot(&self, user: &UserIdentity, event_id: i64, times: &str) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;
        let (start, end) = match parse_slot_times(times) {
            Ok(times) => times,
            Err(BookingError::MalformedInput(_)) => return Ok(finish(messages::BAD_SLOT_FORMAT)),
            Err(e) => return Err(e),
        };

        let slot = match self.services.booking_service.create_slot(event.id, start, end).await {
            Ok(slot) => slot,
            Err(BookingError::InvalidRange { .. }) => return Ok(finish(messages::BAD_SLOT_RANGE)),
            Err(e) => return Err(e),
        };

        Ok(finish(format!(
            "Slot created successfully!\n\nDetails\nEvent: {}\nStart time: {}\nEnd time: {}\nOwner: {}",
            event.name,
            format_datetime(slot.start_time),
            format_datetime(slot.end_time),
            user.display_name
        )))
    }

    // Event management

    async fn offer_own_events(&self, user: &UserIdentity) -> Result<Outcome> {
        let events = self.services.catalog_service.events_owned_by(user.id).await?;
        if events.is_empty() {
            return Ok(finish(messages::NO_OWN_EVENTS));
        }

        Ok(Outcome::Continue(
            S::ChooseOwnEvent,
            Reply::options(messages::SELECT_OWN_EVENT, event_options(events)),
        ))
    }

    async fn offer_slots_for_deletion(&self, user: &UserIdentity, event_id: i64) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;
        let slots = self.services.booking_service.slots_of_event(event_id).await?;
        if slots.is_empty() {
            return Ok(finish(messages::NO_SLOTS_IN_EVENT));
        }

        let options: Vec<_> = slots
            .into_iter()
            .map(|slot| {
                let label = format!("{} - {}", format_datetime(slot.start_time), format_datetime(slot.end_time));
                (label, T::Slot { slot_id: slot.slot_id })
            })
            .collect();
        Ok(Outcome::Continue(
            S::ChooseSlot { event_id },
            Reply::options(format!("Which slot do you want to delete for {}?", event.name), options),
        ))
    }

    async fn confirm_slot_deletion(&self, user: &UserIdentity, event_id: i64, slot_id: i64) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;
        let slot = self.services.booking_service.get_slot(slot_id).await?;
        if slot.event_id != event.id {
            return Err(BookingError::malformed(format!("slot {} is not in event {}", slot_id, event_id)));
        }

        Ok(Outcome::Continue(
            S::ConfirmSlotDeletion { event_id, slot_id },
            Reply::options(
                format!(
                    "Are you sure you want to delete:\n{}\n{} -\n{}?",
                    event.name,
                    format_datetime(slot.start_time),
                    format_datetime(slot.end_time)
                ),
                vec![(messages::CONFIRM_DELETE_SLOT, T::Slot { slot_id })],
            ),
        ))
    }

    async fn delete_slot(&self, user: &UserIdentity, event_id: i64, slot_id: i64) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;
        let slot = self.services.booking_service.delete_slot(slot_id).await?;

        Ok(finish(format!(
            "Slot deleted successfully!\n\nDetails\nEvent: {}\nStart time: {}\nEnd time: {}\n\
             This slot is no more present in the database",
            event.name,
            format_datetime(slot.start_time),
            format_datetime(slot.end_time)
        )))
    }

    async fn confirm_event_deletion(&self, user: &UserIdentity, event_id: i64) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;

        Ok(Outcome::Continue(
            S::ConfirmEventDeletion { event_id },
            Reply::options(
                format!(
                    "Are you sure you want to delete:\n{}?\nAll the related slots will be deleted as well",
                    event.name
                ),
                vec![(messages::CONFIRM_DELETE_EVENT, T::Event { event_id })],
            ),
        ))
    }

    async fn delete_event(&self, user: &UserIdentity, event_id: i64) -> Result<Outcome> {
        self.owned_event(user, event_id).await?;
        let event = self.services.catalog_service.delete_event(event_id, true).await?;

        Ok(finish(format!(
            "Event deleted successfully!\n\nDetails\nEvent: {}\nThis event is no more present in the database",
            event.name
        )))
    }

    async fn show_own_event(&self, user: &UserIdentity, event_id: i64) -> Result<Outcome> {
        let event = self.owned_event(user, event_id).await?;
        let owner = self.services.user_service.get_user(user.id).await?;
        let slots = self.services.booking_service.slots_of_event(event_id).await?;

        let (owner_name, owner_handle) = owner
            .map(|owner| (owner.display_name, owner.handle))
            .unwrap_or_else(|| (user.display_name.clone(), user.handle.clone()));

        let mut text = format!(
            "Event Details\n\nName: {}\n\nDescription: {}\n\nOwner: {}\nOwner Contact: {}",
            event.name, event.description, owner_name, owner_handle
        );

        if slots.is_empty() {
            text.push_str("\n\nYou have currently no slots in this event.");
        } else {
            text.push_str("\n\nSlot List:");
        }
        for slot in slots {
            text.push_str(&format!(
                "\n\n{}\n{}",
                format_datetime(slot.start_time),
                format_datetime(slot.end_time)
            ));
            match slot.holder_id {
                None => text.push_str("\nSlot Available"),
                Some(_) => text.push_str(&format!(
                    "\nSlot booked by: {}\nContact: {}",
                    slot.holder_name.unwrap_or_default(),
                    slot.holder_handle.unwrap_or_default()
                )),
            }
        }

        Ok(finish(text))
    }

    // Administration

    async fn create_fair(&self, user: &UserIdentity, name: &str, text: &str) -> Result<Outcome> {
        self.require_admin(user)?;
        let fair = self.services.catalog_service.create_fair(user.id, name, text).await?;

        Ok(finish(format!(
            "Fair created successfully!\n\nDetails\nFair: {}\nDescription: {}",
            fair.name, fair.description
        )))
    }

    async fn confirm_fair_deletion(&self, user: &UserIdentity, fair_id: i64) -> Result<Outcome> {
        self.require_admin(user)?;
        let fair = self.services.catalog_service.get_fair(fair_id).await?;

        Ok(Outcome::Continue(
            S::ConfirmFairDeletion { fair_id },
            Reply::options(
                format!("Are you sure you want to delete:\n{}?\nIts events will be kept", fair.name),
                vec![(messages::CONFIRM_DELETE_FAIR, T::Fair { fair_id })],
            ),
        ))
    }

    async fn delete_fair(&self, user: &UserIdentity, fair_id: i64) -> Result<Outcome> {
        self.require_admin(user)?;
        let fair = self.services.catalog_service.delete_fair(user.id, fair_id).await?;

        Ok(finish(format!(
            "Fair deleted successfully!\n\nDetails\nFair: {}\nThis fair is no more present in the database",
            fair.name
        )))
    }

    // Checks

    /// The event, provided the user owns it
    async fn owned_event(&self, user: &UserIdentity, event_id: i64) -> Result<Event> {
        let event = self.services.catalog_service.get_event(event_id).await?;
        if event.owner_id != user.id {
            return Err(BookingError::PermissionDenied(format!(
                "event {} is not owned by {}", event_id, user.id
            )));
        }
        Ok(event)
    }

    fn require_admin(&self, user: &UserIdentity) -> Result<()> {
        if self.is_admin(user.id) {
            Ok(())
        } else {
            Err(BookingError::PermissionDenied(format!("{} is not an administrator", user.id)))
        }
    }
}

fn ask(step: ConversationStep, prompt: &str) -> Outcome {
    Outcome::Continue(step, Reply::text(prompt))
}

fn finish(text: impl Into<String>) -> Outcome {
    Outcome::Finish(Reply::text(text))
}

fn event_options(events: Vec<Event>) -> Vec<(String, CallbackToken)> {
    events
        .into_iter()
        .map(|event| (event.name, T::Event { event_id: event.id }))
        .collect()
}

/// Continue only if every offered token still fits Telegram's limit
fn carrying(text: &str, step: ConversationStep, reply: Reply) -> Outcome {
    let longest = reply.buttons().iter().map(|option| option.token.len()).max().unwrap_or(0);
    if longest <= MAX_TOKEN_BYTES {
        return Outcome::Continue(step, reply);
    }

    let overhead = longest.saturating_sub(text.len());
    finish(messages::text_too_long(MAX_TOKEN_BYTES.saturating_sub(overhead)))
}

fn slot_times_text(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{}\n{}", format_datetime(start), format_datetime(end))
}

fn availability_line(availability: Availability) -> String {
    if !availability.has_slots() {
        messages::NO_SLOTS_YET.to_string()
    } else if availability.is_fully_booked() {
        messages::all_slots_booked(availability.total)
    } else {
        format!("Available Slots: {} out of {}", availability.free, availability.total)
    }
}
