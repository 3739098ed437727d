//! Callback query handlers module
//!
//! Button presses go to the dialogue engine as raw callback data; the first
//! reply replaces the message that carried the buttons.

use teloxide::{prelude::*, types::{CallbackQuery, ChatId}};
use tracing::{debug, error, warn};
use crate::middleware::RateLimitMiddleware;
use crate::state::{messages, DialogueEngine, Inbound};
use crate::utils::errors::{BookingError, Result};
use super::{reply, user_identity};

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    engine: &DialogueEngine,
    rate_limiter: &RateLimitMiddleware,
) -> Result<()> {
    let user = user_identity(&query.from);

    if let Err(BookingError::RateLimitExceeded) = rate_limiter.check_rate_limit(user.id) {
        bot.answer_callback_query(query.id.clone())
            .text(messages::RATE_LIMITED)
            .await?;
        return Ok(());
    }

    // Answer the callback query first to remove loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.clone() else {
        debug!(user_id = user.id, "Callback query without data, ignoring");
        return Ok(());
    };

    let origin = query.message.as_ref().map(|m| (m.chat().id, m.id()));
    let chat_id = origin.map(|(chat_id, _)| chat_id).unwrap_or(ChatId(user.id));

    debug!(user_id = user.id, callback_data = %data, "Processing selection");

    let replies = match engine.handle(Inbound::callback(user, data)).await {
        Ok(replies) => replies,
        Err(e) => {
            error!(chat_id = ?chat_id, error = %e, "Selection failed");
            bot.send_message(chat_id, messages::INTERNAL_ERROR).await?;
            return Err(e);
        }
    };

    match (origin, replies.split_first()) {
        (Some((chat_id, message_id)), Some((first, rest))) => {
            reply::edit_reply(&bot, chat_id, message_id, first).await?;
            reply::send_replies(&bot, chat_id, rest).await
        }
        _ => reply::send_replies(&bot, chat_id, &replies).await,
    }
}
