//! Typed per-user session and the stores that persist it between updates.

mod memory;
mod redis_store;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;

pub use memory::InMemorySessionStore;
pub use redis_store::RedisSessionStore;

const KEY_PREFIX: &str = "session:";

/// Session record persisted between updates. Every field is explicit; stored JSON that does
/// not match this shape is discarded at the store boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionData {
    /// Scene the user is currently in, if any.
    #[serde(default)]
    pub scene: Option<SceneState>,
    /// Collected by the registration wizard.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub last_command: Option<String>,
}

/// Position inside a multi-step scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneState {
    pub id: String,
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

impl SceneState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step: 0,
            answers: BTreeMap::new(),
        }
    }
}

/// Session key: `<user_id>:<chat_id>`, or just `<user_id>` for updates without a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(user_id: i64, chat_id: Option<i64>) -> Self {
        match chat_id {
            Some(chat_id) => Self(format!("{}:{}", user_id, chat_id)),
            None => Self(user_id.to_string()),
        }
    }

    /// Full key as stored in Redis.
    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or a fresh one when none (or an invalid one) is stored.
    async fn load(&self, key: &SessionKey) -> Result<SessionData>;
    async fn save(&self, key: &SessionKey, session: &SessionData) -> Result<()>;
    async fn clear(&self, key: &SessionKey) -> Result<()>;
    /// Round-trip check used at startup.
    async fn ping(&self) -> Result<()>;
}

/// Decodes a stored session; anything that fails validation yields a fresh session.
pub(crate) fn decode(key: &SessionKey, raw: Option<&str>) -> SessionData {
    match raw {
        None => SessionData::default(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Discarding invalid stored session");
            SessionData::default()
        }),
    }
}
