//! Per-update context: accumulates references as handlers run and is dropped when the update
//! finishes processing.

use std::sync::Arc;

use storage::UserRecord;

use crate::config::BotConfig;
use crate::core::bot::Bot;
use crate::core::error::{HandlerError, Result};
use crate::core::types::{HandlerResponse, IncomingUpdate};
use crate::reporting::ReportScope;
use crate::services::BoundServices;
use crate::session::{SessionData, SessionKey};

pub struct UpdateContext {
    pub update: IncomingUpdate,
    /// Update exactly as delivered, attached to error reports.
    pub raw: serde_json::Value,
    pub services: Arc<BoundServices>,
    pub bot: Arc<dyn Bot>,
    /// Attached by `AttachUserHandler`.
    pub user: Option<UserRecord>,
    /// True when this update created the user record (first contact).
    pub user_created: bool,
    pub session_key: Option<SessionKey>,
    pub session: SessionData,
    /// Metadata forwarded with an error report if this update fails.
    pub scope: ReportScope,
}

impl UpdateContext {
    pub fn new(
        update: IncomingUpdate,
        raw: serde_json::Value,
        services: Arc<BoundServices>,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            update,
            raw,
            services,
            bot,
            user: None,
            user_created: false,
            session_key: None,
            session: SessionData::default(),
            scope: ReportScope::default(),
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.services.config
    }

    /// Sends `text` to the update's chat and returns `Reply(text)` for the chain.
    pub async fn reply(&self, text: &str) -> Result<HandlerResponse> {
        let chat_id = self
            .update
            .chat_id()
            .ok_or_else(|| HandlerError::State("update has no chat to reply to".into()))?;
        self.bot.send_message(chat_id, text).await?;
        Ok(HandlerResponse::Reply(text.to_string()))
    }
}
