//! In-process session store for tests and local runs without Redis.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{decode, SessionData, SessionKey, SessionStore};
use crate::core::{BotError, Result};

/// Keeps sessions as JSON strings so the same validation applies as with Redis.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw JSON under `key`, bypassing validation.
    pub async fn insert_raw(&self, key: &SessionKey, raw: &str) {
        self.entries
            .write()
            .await
            .insert(key.storage_key(), raw.to_string());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<SessionData> {
        let entries = self.entries.read().await;
        Ok(decode(key, entries.get(&key.storage_key()).map(String::as_str)))
    }

    async fn save(&self, key: &SessionKey, session: &SessionData) -> Result<()> {
        let raw = serde_json::to_string(session).map_err(|e| BotError::Session(e.to_string()))?;
        self.entries.write().await.insert(key.storage_key(), raw);
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<()> {
        self.entries.write().await.remove(&key.storage_key());
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
