//! Binds the session store to the update: load before, save after.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::{Handler, HandlerResponse, Result, UpdateContext};
use crate::session::{SessionKey, SessionStore};

#[derive(Clone)]
pub struct SessionHandler {
    store: Arc<dyn SessionStore>,
}

impl SessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Handler for SessionHandler {
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    async fn before(&self, ctx: &mut UpdateContext) -> Result<bool> {
        // AttachUserHandler guarantees a sender by now.
        let Some(user_id) = ctx.update.sender_id() else {
            return Ok(true);
        };
        let key = SessionKey::new(user_id, ctx.update.chat_id());
        ctx.session = self.store.load(&key).await?;
        let snapshot = serde_json::to_value(&ctx.session).unwrap_or_default();
        ctx.scope.set_extra("session", snapshot);
        if let Some(scene) = ctx.session.scene.as_ref() {
            ctx.scope.set_tag("scene", scene.id.clone());
        }
        debug!(key = %key, "step: SessionHandler before done, session loaded");
        ctx.session_key = Some(key);
        Ok(true)
    }

    async fn after(&self, ctx: &mut UpdateContext, _response: &HandlerResponse) -> Result<()> {
        if let Some(key) = ctx.session_key.as_ref() {
            self.store.save(key, &ctx.session).await?;
            debug!(key = %key, "step: SessionHandler after done, session saved");
        }
        Ok(())
    }
}
