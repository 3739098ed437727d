//! State management module
//!
//! This module holds the dialogue engine, its conversation state and the
//! storage that keeps open conversations between updates.

pub mod callback;
pub mod context;
pub mod dialogue;
pub mod messages;
pub mod scenarios;
pub mod storage;

// Re-export commonly used state components
pub use callback::{CallbackToken, MAX_TOKEN_BYTES};
pub use context::{ConversationCommand, ConversationContext, ConversationKey, ConversationStep};
pub use dialogue::{DialogueEngine, Inbound, InboundKind, Reply, ReplyOption, UserIdentity};
pub use storage::{MemoryStorage, RedisStorage, StateStorage};
