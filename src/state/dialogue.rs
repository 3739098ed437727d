//! Dialogue engine
//!
//! Turns inbound commands, selections and free text into replies, keeping at
//! most one open conversation per user. The per-command steps live in
//! [`super::scenarios`].

use std::collections::HashSet;
use std::sync::Arc;
use chrono::Duration;
use tracing::{debug, info, warn};
use crate::config::Settings;
use crate::models::UpsertUserRequest;
use crate::services::ServiceFactory;
use crate::utils::errors::{BookingError, Result};
use crate::utils::helpers::format_datetime;
use crate::utils::logging::{log_stale_listing, log_user_action};
use super::callback::CallbackToken;
use super::context::{ConversationCommand, ConversationContext, ConversationStep};
use super::messages;
use super::storage::StateStorage;

/// Who sent an update, with the display metadata stored on upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: i64,
    pub display_name: String,
    pub handle: String,
}

impl UserIdentity {
    pub fn new(id: i64, display_name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            handle: handle.into(),
        }
    }

    pub fn upsert_request(&self) -> UpsertUserRequest {
        UpsertUserRequest::new(self.id, self.display_name.clone(), self.handle.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    /// Command text including the leading slash, arguments ignored
    Command(String),
    /// Raw callback data of a pressed button
    Callback(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub user: UserIdentity,
    pub kind: InboundKind,
}

impl Inbound {
    pub fn command(user: UserIdentity, command: impl Into<String>) -> Self {
        Self { user, kind: InboundKind::Command(command.into()) }
    }

    pub fn callback(user: UserIdentity, data: impl Into<String>) -> Self {
        Self { user, kind: InboundKind::Callback(data.into()) }
    }

    pub fn text(user: UserIdentity, text: impl Into<String>) -> Self {
        Self { user, kind: InboundKind::Text(text.into()) }
    }
}

/// A button offered with a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOption {
    pub label: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Text with ordered buttons; the last one is always cancel
    Options { text: String, options: Vec<ReplyOption> },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    /// Build a selection prompt, appending the cancel button
    pub fn options<L: Into<String>>(text: impl Into<String>, options: Vec<(L, CallbackToken)>) -> Self {
        let mut options: Vec<ReplyOption> = options
            .into_iter()
            .map(|(label, token)| ReplyOption { label: label.into(), token: token.encode() })
            .collect();
        options.push(ReplyOption {
            label: messages::CANCEL_LABEL.to_string(),
            token: CallbackToken::Cancel.encode(),
        });

        Reply::Options { text: text.into(), options }
    }

    pub fn body(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Options { text, .. } => text,
        }
    }

    pub fn buttons(&self) -> &[ReplyOption] {
        match self {
            Reply::Text(_) => &[],
            Reply::Options { options, .. } => options,
        }
    }
}

/// Result of a conversation step
#[derive(Debug)]
pub(super) enum Outcome {
    /// Move to the given step and show the reply
    Continue(ConversationStep, Reply),
    /// Close the conversation with the reply
    Finish(Reply),
}

/// Commands answered without opening a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlainCommand {
    Start,
    Help,
    WhoAmI,
    MyBookings,
    Cancel,
}

impl PlainCommand {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(PlainCommand::Start),
            "help" => Some(PlainCommand::Help),
            "whoami" => Some(PlainCommand::WhoAmI),
            "mybookings" => Some(PlainCommand::MyBookings),
            "cancel" => Some(PlainCommand::Cancel),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DialogueEngine {
    pub(super) services: ServiceFactory,
    storage: StateStorage,
    ttl: Duration,
    admin_ids: Arc<HashSet<i64>>,
}

impl DialogueEngine {
    pub fn new(services: ServiceFactory, storage: StateStorage, settings: &Settings) -> Self {
        Self::with_options(
            services,
            storage,
            settings.dialogue.ttl(),
            settings.bot.admin_ids.iter().copied(),
        )
    }

    pub fn with_options(
        services: ServiceFactory,
        storage: StateStorage,
        ttl: Duration,
        admin_ids: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            services,
            storage,
            ttl,
            admin_ids: Arc::new(admin_ids.into_iter().collect()),
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    pub fn storage(&self) -> &StateStorage {
        &self.storage
    }

    /// Process one inbound update.
    ///
    /// Usually one reply; two when a command closes another open conversation.
    pub async fn handle(&self, inbound: Inbound) -> Result<Vec<Reply>> {
        let Inbound { user, kind } = inbound;
        match kind {
            InboundKind::Command(command) => self.handle_command(&user, &command).await,
            InboundKind::Callback(data) => self.handle_callback(&user, &data).await,
            InboundKind::Text(text) => self.handle_text(&user, &text).await,
        }
    }

    async fn handle_command(&self, user: &UserIdentity, raw: &str) -> Result<Vec<Reply>> {
        let word = raw.split_whitespace().next().unwrap_or_default();
        let name = word
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let conversation = ConversationCommand::from_name(&name);
        let plain = PlainCommand::from_name(&name);

        log_user_action(user.id, "command", Some(word));

        let mut replies = Vec::new();
        if let Some(active) = self.storage.find_active(user.id).await? {
            if conversation == Some(active.command) {
                debug!(user_id = user.id, command = %active.command, "Command already active");
                return Ok(vec![Reply::text(messages::ALREADY_ACTIVE)]);
            }

            self.storage.delete(active.key()).await?;
            if plain == Some(PlainCommand::Cancel) {
                return Ok(vec![Reply::text(messages::CANCELLED)]);
            }
            info!(user_id = user.id, closed = %active.command, "Conversation interrupted by another command");
            replies.push(Reply::text(messages::UNRECOGNIZED));
        }

        let reply = match (plain, conversation) {
            (Some(PlainCommand::Start), _) => Reply::text(messages::START),
            (Some(PlainCommand::Help), _) => self.help(user),
            (Some(PlainCommand::WhoAmI), _) => self.whoami(user).await?,
            (Some(PlainCommand::MyBookings), _) => self.my_bookings(user).await?,
            (Some(PlainCommand::Cancel), _) => Reply::text(messages::NOTHING_TO_CANCEL),
            (None, Some(command)) => self.open_conversation(user, command).await?,
            (None, None) => Reply::text(messages::unknown_command(word)),
        };
        replies.push(reply);

        Ok(replies)
    }

    async fn handle_callback(&self, user: &UserIdentity, data: &str) -> Result<Vec<Reply>> {
        let Some(mut context) = self.storage.find_active(user.id).await? else {
            debug!(user_id = user.id, data = data, "Selection without an open conversation");
            return Ok(vec![Reply::text(messages::STALE_SELECTION)]);
        };

        let token = match CallbackToken::parse(data) {
            Ok(token) => token,
            Err(e) => {
                debug!(user_id = user.id, error = %e, "Rejected callback token");
                return Ok(vec![self.close(&context, messages::UNRECOGNIZED).await?]);
            }
        };

        if token == CallbackToken::Cancel {
            return Ok(vec![self.close(&context, messages::CANCELLED).await?]);
        }

        let outcome = self.on_selection(&context, user, token).await;
        Ok(vec![self.resolve(&mut context, outcome).await?])
    }

    async fn handle_text(&self, user: &UserIdentity, text: &str) -> Result<Vec<Reply>> {
        let Some(mut context) = self.storage.find_active(user.id).await? else {
            return Ok(vec![Reply::text(messages::FREE_TEXT)]);
        };

        if !context.step.expects_text() {
            debug!(user_id = user.id, step = context.step.label(), "Text where a selection was expected");
            return Ok(vec![self.close(&context, messages::UNRECOGNIZED).await?]);
        }

        let outcome = self.on_text(&context, user, text).await;
        Ok(vec![self.resolve(&mut context, outcome).await?])
    }

    async fn open_conversation(&self, user: &UserIdentity, command: ConversationCommand) -> Result<Reply> {
        if command.is_admin_only() && !self.is_admin(user.id) {
            warn!(user_id = user.id, command = %command, "Admin command refused");
            return Ok(Reply::text(messages::ADMIN_ONLY));
        }

        match self.enter(user, command).await? {
            Outcome::Finish(reply) => Ok(reply),
            Outcome::Continue(step, reply) => {
                let context = ConversationContext::new(user.id, command, step, self.ttl);
                if !self.storage.try_open(&context).await? {
                    return Ok(Reply::text(messages::ALREADY_ACTIVE));
                }
                debug!(user_id = user.id, command = %command, step = context.step.label(), "Conversation opened");
                Ok(reply)
            }
        }
    }

    /// Apply a step outcome to the stored conversation.
    ///
    /// Every path except `Continue` closes the conversation, including
    /// infrastructure failures which are then returned to the caller.
    async fn resolve(&self, context: &mut ConversationContext, outcome: Result<Outcome>) -> Result<Reply> {
        match outcome {
            Ok(Outcome::Continue(step, reply)) => {
                context.advance(step, self.ttl)?;
                self.storage.save(context).await?;
                Ok(reply)
            }
            Ok(Outcome::Finish(reply)) => {
                self.storage.delete(context.key()).await?;
                Ok(reply)
            }
            Err(e @ (BookingError::NotFound { .. } | BookingError::Conflict(_))) => {
                log_stale_listing(context.user_id, context.command.name(), &e);
                self.close(context, messages::STALE_RECORD).await
            }
            Err(BookingError::MalformedInput(reason)) => {
                debug!(user_id = context.user_id, reason = %reason, "Unrecognized input");
                self.close(context, messages::UNRECOGNIZED).await
            }
            Err(BookingError::PermissionDenied(reason)) => {
                warn!(user_id = context.user_id, reason = %reason, "Selection of a record not owned by the user");
                self.close(context, messages::UNRECOGNIZED).await
            }
            Err(e) if e.is_domain() => {
                debug!(user_id = context.user_id, error = %e, "Domain error without a dedicated reply");
                self.close(context, messages::UNRECOGNIZED).await
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(context.key()).await {
                    warn!(user_id = context.user_id, error = %cleanup, "Failed to close conversation after error");
                }
                Err(e)
            }
        }
    }

    async fn close(&self, context: &ConversationContext, text: &str) -> Result<Reply> {
        self.storage.delete(context.key()).await?;
        Ok(Reply::text(text))
    }

    fn help(&self, user: &UserIdentity) -> Reply {
        if self.is_admin(user.id) {
            Reply::text(format!("{}{}", messages::HELP, messages::HELP_ADMIN))
        } else {
            Reply::text(messages::HELP)
        }
    }

    async fn whoami(&self, user: &UserIdentity) -> Result<Reply> {
        let text = match self.services.user_service.get_user(user.id).await? {
            None => format!(
                "This chat is not associated to metadata yet.\nYour ID is: {}",
                user.id
            ),
            Some(stored) => format!(
                "This chat is associated to the following metadata:\n\n\
                 User ID: {}\nName: {}\nUsername: {}",
                stored.id, stored.display_name, stored.handle
            ),
        };

        Ok(Reply::text(text))
    }

    async fn my_bookings(&self, user: &UserIdentity) -> Result<Reply> {
        let bookings = self.services.booking_service.slots_booked_by(user.id).await?;
        if bookings.is_empty() {
            return Ok(Reply::text(messages::NO_BOOKINGS));
        }

        let mut text = String::from("You have the following bookings:");
        for booking in bookings {
            text.push_str(&format!(
                "\n\n{}\nstart: {}\nend:   {}",
                booking.event_name,
                format_datetime(booking.start_time),
                format_datetime(booking.end_time)
            ));
        }

        Ok(Reply::text(text))
    }
}
