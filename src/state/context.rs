//! Conversation context management
//!
//! An open conversation is identified by the user and the command that
//! started it, and remembers which step of that command's dialogue the user
//! is in.

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use crate::utils::errors::{BookingError, Result};

/// Commands that open a multi-step conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationCommand {
    Fairs,
    Events,
    Book,
    Unbook,
    Publish,
    ChangeDes,
    NewSlot,
    DeleteSlot,
    DeleteEvent,
    MyEvents,
    NewFair,
    DeleteFair,
}

impl ConversationCommand {
    pub const ALL: [ConversationCommand; 12] = [
        ConversationCommand::Fairs,
        ConversationCommand::Events,
        ConversationCommand::Book,
        ConversationCommand::Unbook,
        ConversationCommand::Publish,
        ConversationCommand::ChangeDes,
        ConversationCommand::NewSlot,
        ConversationCommand::DeleteSlot,
        ConversationCommand::DeleteEvent,
        ConversationCommand::MyEvents,
        ConversationCommand::NewFair,
        ConversationCommand::DeleteFair,
    ];

    /// Command name as typed after the slash
    pub fn name(&self) -> &'static str {
        match self {
            ConversationCommand::Fairs => "fairs",
            ConversationCommand::Events => "events",
            ConversationCommand::Book => "book",
            ConversationCommand::Unbook => "unbook",
            ConversationCommand::Publish => "publish",
            ConversationCommand::ChangeDes => "changedes",
            ConversationCommand::NewSlot => "newslot",
            ConversationCommand::DeleteSlot => "deleteslot",
            ConversationCommand::DeleteEvent => "deleteevent",
            ConversationCommand::MyEvents => "myevents",
            ConversationCommand::NewFair => "newfair",
            ConversationCommand::DeleteFair => "deletefair",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Restricted to the configured administrators
    pub fn is_admin_only(&self) -> bool {
        matches!(self, ConversationCommand::NewFair | ConversationCommand::DeleteFair)
    }
}

impl fmt::Display for ConversationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Position inside a conversation.
///
/// Steps remember the ids picked earlier so later selections can be checked
/// against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConversationStep {
    ChooseFair,
    ChooseEvent { fair_id: i64 },
    ChooseDay { event_id: i64 },
    ChooseTime { event_id: i64 },
    ChooseBooking,
    ConfirmUnbook { slot_id: i64 },
    AwaitEventName,
    ChooseFairForEvent,
    AwaitDescription,
    ChooseEventForDescription,
    AwaitSlotTimes,
    ChooseEventForSlot,
    ChooseOwnEvent,
    ChooseSlot { event_id: i64 },
    ConfirmSlotDeletion { event_id: i64, slot_id: i64 },
    ConfirmEventDeletion { event_id: i64 },
    AwaitFairName,
    AwaitFairDescription { name: String },
    ConfirmFairDeletion { fair_id: i64 },
}

impl ConversationStep {
    /// Whether the step waits for free text rather than a selection
    pub fn expects_text(&self) -> bool {
        matches!(
            self,
            ConversationStep::AwaitEventName
                | ConversationStep::AwaitDescription
                | ConversationStep::AwaitSlotTimes
                | ConversationStep::AwaitFairName
                | ConversationStep::AwaitFairDescription { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConversationStep::ChooseFair => "choose_fair",
            ConversationStep::ChooseEvent { .. } => "choose_event",
            ConversationStep::ChooseDay { .. } => "choose_day",
            ConversationStep::ChooseTime { .. } => "choose_time",
            ConversationStep::ChooseBooking => "choose_booking",
            ConversationStep::ConfirmUnbook { .. } => "confirm_unbook",
            ConversationStep::AwaitEventName => "await_event_name",
            ConversationStep::ChooseFairForEvent => "choose_fair_for_event",
            ConversationStep::AwaitDescription => "await_description",
            ConversationStep::ChooseEventForDescription => "choose_event_for_description",
            ConversationStep::AwaitSlotTimes => "await_slot_times",
            ConversationStep::ChooseEventForSlot => "choose_event_for_slot",
            ConversationStep::ChooseOwnEvent => "choose_own_event",
            ConversationStep::ChooseSlot { .. } => "choose_slot",
            ConversationStep::ConfirmSlotDeletion { .. } => "confirm_slot_deletion",
            ConversationStep::ConfirmEventDeletion { .. } => "confirm_event_deletion",
            ConversationStep::AwaitFairName => "await_fair_name",
            ConversationStep::AwaitFairDescription { .. } => "await_fair_description",
            ConversationStep::ConfirmFairDeletion { .. } => "confirm_fair_deletion",
        }
    }
}

/// Storage key of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub user_id: i64,
    pub command: ConversationCommand,
}

/// An open conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub user_id: i64,
    pub command: ConversationCommand,
    pub step: ConversationStep,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Open a conversation at its first interior step
    pub fn new(user_id: i64, command: ConversationCommand, step: ConversationStep, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            command,
            step,
            started_at: now,
            updated_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey {
            user_id: self.user_id,
            command: self.command,
        }
    }

    /// Move to the next step and refresh the expiry
    pub fn advance(&mut self, step: ConversationStep, ttl: Duration) -> Result<()> {
        if self.is_expired() {
            return Err(BookingError::InvalidStateTransition {
                from: format!("{} (expired)", self.step.label()),
                to: step.label().to_string(),
            });
        }

        self.step = step;
        self.updated_at = Utc::now();
        self.expires_at = self.updated_at + ttl;
        Ok(())
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Seconds left before expiry, never below one
    pub fn remaining_seconds(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(1) as u64
    }
}
