//! Command handlers module
//!
//! Every command goes to the dialogue engine; this module only knows the
//! command list advertised to Telegram.

use teloxide::{prelude::*, types::Message, utils::command::BotCommands};
use tracing::{debug, error};
use crate::middleware::RateLimitMiddleware;
use crate::state::{messages, DialogueEngine, Inbound};
use crate::utils::errors::{BookingError, Result};
use super::{reply, user_identity};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "FairBooking commands:")]
pub enum Command {
    #[command(description = "Start the bot and show the welcome message")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Show all the fairs and their descriptions")]
    Fairs,
    #[command(description = "Show all events of a fair")]
    Events,
    #[command(description = "Show the metadata associated with this chat")]
    WhoAmI,
    #[command(description = "Book a slot for an event")]
    Book,
    #[command(description = "Cancel your booking for a slot")]
    Unbook,
    #[command(description = "Show all your active bookings")]
    MyBookings,
    #[command(description = "Create a new event")]
    Publish,
    #[command(description = "Change the description of an event of yours")]
    ChangeDes,
    #[command(description = "Add a new bookable slot to an event of yours")]
    NewSlot,
    #[command(description = "Delete a slot from an event of yours")]
    DeleteSlot,
    #[command(description = "Delete an event and all associated slots")]
    DeleteEvent,
    #[command(description = "Show all the events you own")]
    MyEvents,
    #[command(description = "Create a new fair (admin only)")]
    NewFair,
    #[command(description = "Delete a fair (admin only)")]
    DeleteFair,
    #[command(description = "Cancel the active command")]
    Cancel,
}

impl Command {
    /// Command as typed, with the leading slash
    pub fn as_text(&self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Help => "/help",
            Command::Fairs => "/fairs",
            Command::Events => "/events",
            Command::WhoAmI => "/whoami",
            Command::Book => "/book",
            Command::Unbook => "/unbook",
            Command::MyBookings => "/mybookings",
            Command::Publish => "/publish",
            Command::ChangeDes => "/changedes",
            Command::NewSlot => "/newslot",
            Command::DeleteSlot => "/deleteslot",
            Command::DeleteEvent => "/deleteevent",
            Command::MyEvents => "/myevents",
            Command::NewFair => "/newfair",
            Command::DeleteFair => "/deletefair",
            Command::Cancel => "/cancel",
        }
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: &DialogueEngine,
    rate_limiter: &RateLimitMiddleware,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = ?msg.chat.id, "Command without a sender, ignoring");
        return Ok(());
    };
    let user = user_identity(user);
    let chat_id = msg.chat.id;

    if let Err(BookingError::RateLimitExceeded) = rate_limiter.check_rate_limit(user.id) {
        bot.send_message(chat_id, messages::RATE_LIMITED).await?;
        return Ok(());
    }

    debug!(user_id = user.id, command = cmd.as_text(), "Processing command");

    match engine.handle(Inbound::command(user, cmd.as_text())).await {
        Ok(replies) => reply::send_replies(&bot, chat_id, &replies).await,
        Err(e) => {
            error!(chat_id = ?chat_id, command = cmd.as_text(), error = %e, "Command failed");
            bot.send_message(chat_id, messages::INTERNAL_ERROR).await?;
            Err(e)
        }
    }
}
