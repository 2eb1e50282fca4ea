//! Redis-backed session store.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, info, instrument};

use super::{decode, SessionData, SessionKey, SessionStore};
use crate::core::{BotError, Result};

/// Sessions as JSON strings under `session:<user>:<chat>`, optionally expiring after `ttl_secs`.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
    ttl_secs: Option<u64>,
}

fn session_error(e: impl std::fmt::Display) -> BotError {
    BotError::Session(e.to_string())
}

impl RedisSessionStore {
    /// Connects to `redis_url`. Connection failure is a startup error.
    #[instrument(skip(redis_url))]
    pub async fn connect(redis_url: &str, ttl_secs: Option<u64>) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(session_error)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(session_error)?;
        info!(ttl_secs = ?ttl_secs, "Redis session store connected");
        Ok(Self {
            connection,
            ttl_secs,
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<SessionData> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(key.storage_key()).await.map_err(session_error)?;
        Ok(decode(key, raw.as_deref()))
    }

    async fn save(&self, key: &SessionKey, session: &SessionData) -> Result<()> {
        let raw = serde_json::to_string(session).map_err(session_error)?;
        let mut conn = self.connection.clone();
        match self.ttl_secs {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key.storage_key(), raw, ttl)
                    .await
                    .map_err(session_error)?;
            }
            None => {
                let _: () = conn
                    .set(key.storage_key(), raw)
                    .await
                    .map_err(session_error)?;
            }
        }
        debug!(key = %key, "Session saved");
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key.storage_key()).await.map_err(session_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(session_error)?;
        if pong != "PONG" {
            return Err(BotError::Session(format!("unexpected PING reply: {}", pong)));
        }
        Ok(())
    }
}
