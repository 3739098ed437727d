//! Rendering of dialogue replies as Telegram messages

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId},
};
use tracing::{debug, warn};
use crate::state::Reply;
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;

/// Telegram rejects message texts longer than this
const MAX_MESSAGE_CHARS: usize = 4096;

/// One button per row, in the order the engine offered them
pub fn keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    let buttons = reply.buttons();
    if buttons.is_empty() {
        return None;
    }

    let rows = buttons
        .iter()
        .map(|option| vec![InlineKeyboardButton::callback(option.label.clone(), option.token.clone())]);
    Some(InlineKeyboardMarkup::new(rows))
}

fn body(reply: &Reply) -> String {
    truncate_text(reply.body(), MAX_MESSAGE_CHARS)
}

pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    let mut request = bot.send_message(chat_id, body(reply));
    if let Some(markup) = keyboard(reply) {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: &[Reply]) -> Result<()> {
    for reply in replies {
        send_reply(bot, chat_id, reply).await?;
    }
    Ok(())
}

/// Replace the message that carried the pressed button.
///
/// Falls back to a new message when Telegram refuses the edit, e.g. for an
/// unchanged text or a message too old to be edited.
pub async fn edit_reply(bot: &Bot, chat_id: ChatId, message_id: MessageId, reply: &Reply) -> Result<()> {
    let mut request = bot.edit_message_text(chat_id, message_id, body(reply));
    if let Some(markup) = keyboard(reply) {
        request = request.reply_markup(markup);
    }

    match request.await {
        Ok(_) => {
            debug!(chat_id = ?chat_id, message_id = ?message_id, "Edited selection message");
            Ok(())
        }
        Err(e) => {
            warn!(chat_id = ?chat_id, error = %e, "Failed to edit message, sending a new one");
            send_reply(bot, chat_id, reply).await
        }
    }
}
