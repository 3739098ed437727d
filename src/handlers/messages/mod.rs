//! Message handlers module
//!
//! Plain text feeds the open conversation; slash-prefixed text the command
//! filter did not recognise still reaches the engine as a command so it can
//! answer with the unknown-command reply.

use teloxide::{prelude::*, types::Message};
use tracing::{debug, error};
use crate::middleware::RateLimitMiddleware;
use crate::state::{messages, DialogueEngine};
use crate::utils::errors::{BookingError, Result};
use super::{inbound_from_text, reply, user_identity};

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    engine: &DialogueEngine,
    rate_limiter: &RateLimitMiddleware,
) -> Result<()> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        debug!(chat_id = ?msg.chat.id, "Ignoring message without sender or text");
        return Ok(());
    };
    let user = user_identity(user);
    let chat_id = msg.chat.id;

    if let Err(BookingError::RateLimitExceeded) = rate_limiter.check_rate_limit(user.id) {
        bot.send_message(chat_id, messages::RATE_LIMITED).await?;
        return Ok(());
    }

    debug!(user_id = user.id, chat_id = ?chat_id, "Processing message");

    match engine.handle(inbound_from_text(user, text)).await {
        Ok(replies) => reply::send_replies(&bot, chat_id, &replies).await,
        Err(e) => {
            error!(chat_id = ?chat_id, error = %e, "Message handling failed");
            bot.send_message(chat_id, messages::INTERNAL_ERROR).await?;
            Err(e)
        }
    }
}
