//! Fills the per-update report scope so a failure anywhere later carries its context.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::{Handler, Result, UpdateContext};

/// First handler in the chain. Tags the scope with the redacted config, the raw update and
/// the sender; the chain reports against this scope if a later handler fails.
#[derive(Clone, Default)]
pub struct ErrorScopeHandler;

impl ErrorScopeHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for ErrorScopeHandler {
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    async fn before(&self, ctx: &mut UpdateContext) -> Result<bool> {
        let config = ctx.config().general.redacted();
        let app_env = ctx.config().env.app_env.clone();
        let raw = ctx.raw.clone();

        ctx.scope.set_extra("config", config);
        ctx.scope.set_extra("update", raw);
        ctx.scope.set_tag("app_env", app_env);
        if let Some(sender) = ctx.update.sender_id() {
            ctx.scope.set_user(sender);
        }
        debug!("step: ErrorScopeHandler before done, scope tagged");
        Ok(true)
    }
}
