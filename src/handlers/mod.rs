//! Bot handlers module
//!
//! Thin Telegram adapter over the dialogue engine:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard selections
//! - Message handlers for free text
//!
//! Handlers translate updates into [`Inbound`] values, apply rate limiting
//! and render the engine's replies; no booking logic lives here.

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod reply;

use teloxide::types::User;
use crate::state::{Inbound, UserIdentity};
use crate::utils::helpers;

pub use commands::{handle_command, Command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;

/// Identity of a Telegram user as stored on upsert
pub fn user_identity(user: &User) -> UserIdentity {
    UserIdentity::new(
        user.id.0 as i64,
        helpers::display_name(&user.first_name, user.last_name.as_deref()),
        helpers::handle(user.username.as_deref()),
    )
}

/// Classify message text; anything starting with a slash is a command
pub fn inbound_from_text(user: UserIdentity, text: &str) -> Inbound {
    if text.starts_with('/') {
        Inbound::command(user, text)
    } else {
        Inbound::text(user, text)
    }
}
