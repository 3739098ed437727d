//! State storage implementation
//!
//! Open conversations live either in process memory or in Redis. Both
//! backends drop expired conversations on read, so callers never see one.

use std::collections::HashMap;
use std::sync::Arc;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use crate::config::{DialogueConfig, RedisConfig, StateBackend};
use crate::utils::errors::{BookingError, Result};
use super::context::{ConversationCommand, ConversationContext, ConversationKey};

/// Conversation storage with a backend chosen at startup
#[derive(Debug, Clone)]
pub enum StateStorage {
    Memory(MemoryStorage),
    Redis(RedisStorage),
}

impl StateStorage {
    /// Build the backend selected in the dialogue configuration
    pub async fn from_config(dialogue: &DialogueConfig, redis: Option<&RedisConfig>) -> Result<Self> {
        match dialogue.backend {
            StateBackend::Memory => Ok(StateStorage::memory()),
            StateBackend::Redis => {
                let config = redis.ok_or_else(|| {
                    BookingError::Config("Redis state backend selected without a redis section".to_string())
                })?;
                Ok(StateStorage::Redis(RedisStorage::new(config.clone()).await?))
            }
        }
    }

    pub fn memory() -> Self {
        StateStorage::Memory(MemoryStorage::default())
    }

    /// Load a conversation, dropping it if expired
    pub async fn load(&self, key: ConversationKey) -> Result<Option<ConversationContext>> {
        match self {
            StateStorage::Memory(storage) => Ok(storage.load(key).await),
            StateStorage::Redis(storage) => storage.load(key).await,
        }
    }

    /// The open conversation of a user, whichever command started it
    pub async fn find_active(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        match self {
            StateStorage::Memory(storage) => Ok(storage.find_active(user_id).await),
            StateStorage::Redis(storage) => storage.find_active(user_id).await,
        }
    }

    /// Store a conversation only if none is open under the same key.
    ///
    /// Returns `false` when a live conversation already holds the key.
    pub async fn try_open(&self, context: &ConversationContext) -> Result<bool> {
        match self {
            StateStorage::Memory(storage) => Ok(storage.try_open(context).await),
            StateStorage::Redis(storage) => storage.try_open(context).await,
        }
    }

    /// Overwrite a conversation after a step change
    pub async fn save(&self, context: &ConversationContext) -> Result<()> {
        match self {
            StateStorage::Memory(storage) => {
                storage.save(context).await;
                Ok(())
            }
            StateStorage::Redis(storage) => storage.save(context).await,
        }
    }

    pub async fn delete(&self, key: ConversationKey) -> Result<()> {
        match self {
            StateStorage::Memory(storage) => {
                storage.delete(key).await;
                Ok(())
            }
            StateStorage::Redis(storage) => storage.delete(key).await,
        }
    }

    /// Remove expired conversations of every user.
    ///
    /// Redis keys carry their own TTL, so only the memory backend has work to do.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        match self {
            StateStorage::Memory(storage) => Ok(storage.cleanup_expired().await),
            StateStorage::Redis(_) => Ok(0),
        }
    }
}

/// In-process storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    conversations: Arc<RwLock<HashMap<ConversationKey, ConversationContext>>>,
}

impl MemoryStorage {
    async fn load(&self, key: ConversationKey) -> Option<ConversationContext> {
        {
            let conversations = self.conversations.read().await;
            match conversations.get(&key) {
                Some(context) if !context.is_expired() => return Some(context.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        debug!(user_id = key.user_id, command = %key.command, "Dropping expired conversation");
        self.delete(key).await;
        None
    }

    async fn find_active(&self, user_id: i64) -> Option<ConversationContext> {
        let mut conversations = self.conversations.write().await;
        conversations.retain(|key, context| key.user_id != user_id || !context.is_expired());
        conversations
            .values()
            .find(|context| context.user_id == user_id)
            .cloned()
    }

    async fn try_open(&self, context: &ConversationContext) -> bool {
        let mut conversations = self.conversations.write().await;
        match conversations.get(&context.key()) {
            Some(existing) if !existing.is_expired() => false,
            _ => {
                conversations.insert(context.key(), context.clone());
                true
            }
        }
    }

    async fn save(&self, context: &ConversationContext) {
        self.conversations.write().await.insert(context.key(), context.clone());
    }

    async fn delete(&self, key: ConversationKey) {
        self.conversations.write().await.remove(&key);
    }

    async fn cleanup_expired(&self) -> usize {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, context| !context.is_expired());
        before - conversations.len()
    }

    /// Number of stored conversations, expired ones included
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Redis-backed storage; conversations are JSON values with a TTL
#[derive(Clone)]
pub struct RedisStorage {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl RedisStorage {
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    async fn load(&self, key: ConversationKey) -> Result<Option<ConversationContext>> {
        let redis_key = self.context_key(key.user_id, key.command);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&redis_key).await?;
        let Some(data) = serialized else {
            return Ok(None);
        };

        let context: ConversationContext = match serde_json::from_str(&data) {
            Ok(context) => context,
            Err(e) => {
                error!(user_id = key.user_id, key = %redis_key, error = %e, "Failed to deserialize conversation");
                self.delete(key).await?;
                return Ok(None);
            }
        };

        if context.is_expired() {
            warn!(user_id = key.user_id, expires_at = %context.expires_at, "Conversation has expired, removing");
            self.delete(key).await?;
            return Ok(None);
        }

        Ok(Some(context))
    }

    async fn find_active(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let pattern = format!("{}conversation:{}:*", self.config.prefix, user_id);
        let mut conn = self.connection_manager.clone();
        let keys: Vec<String> = conn.keys(&pattern).await?;

        for redis_key in keys {
            if let Some(command) = command_from_key(&redis_key) {
                if let Some(context) = self.load(ConversationKey { user_id, command }).await? {
                    return Ok(Some(context));
                }
            }
        }

        Ok(None)
    }

    async fn try_open(&self, context: &ConversationContext) -> Result<bool> {
        let redis_key = self.context_key(context.user_id, context.command);
        let serialized = serde_json::to_string(context)?;
        let mut conn = self.connection_manager.clone();

        let opened: Option<String> = open_command(&redis_key, &serialized, context.remaining_seconds())
            .query_async(&mut conn)
            .await?;

        debug!(user_id = context.user_id, key = %redis_key, opened = opened.is_some(), "Conversation open attempt");
        Ok(opened.is_some())
    }

    async fn save(&self, context: &ConversationContext) -> Result<()> {
        let redis_key = self.context_key(context.user_id, context.command);
        let serialized = serde_json::to_string(context)?;
        let mut conn = self.connection_manager.clone();

        conn.set_ex::<_, _, ()>(&redis_key, serialized, context.remaining_seconds()).await?;
        Ok(())
    }

    async fn delete(&self, key: ConversationKey) -> Result<()> {
        let redis_key = self.context_key(key.user_id, key.command);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&redis_key).await?;
        debug!(user_id = key.user_id, deleted = deleted, "Deleted conversation");
        Ok(())
    }

    fn context_key(&self, user_id: i64, command: ConversationCommand) -> String {
        context_key(&self.config.prefix, user_id, command)
    }
}

fn context_key(prefix: &str, user_id: i64, command: ConversationCommand) -> String {
    format!("{}conversation:{}:{}", prefix, user_id, command.name())
}

/// Command segment of a key built by [`context_key`]
fn command_from_key(redis_key: &str) -> Option<ConversationCommand> {
    redis_key
        .rsplit(':')
        .next()
        .and_then(ConversationCommand::from_name)
}

/// `SET key value NX EX ttl`: stores only when no live conversation holds the key
fn open_command(redis_key: &str, serialized: &str, ttl_seconds: u64) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(redis_key)
        .arg(serialized)
        .arg("NX")
        .arg("EX")
        .arg(ttl_seconds);
    cmd
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
