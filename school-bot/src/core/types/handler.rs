//! Handler trait: the unit the chain is built from.

use async_trait::async_trait;

use super::response::HandlerResponse;
use crate::core::context::UpdateContext;
use crate::core::error::Result;

/// Single handler concept: optional before / handle / after over the per-update context.
/// Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short type name used in logs and chain introspection.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _ctx: &mut UpdateContext) -> Result<bool> {
        Ok(true)
    }
    /// Processes the update. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(&self, _ctx: &mut UpdateContext, _response: &HandlerResponse) -> Result<()> {
        Ok(())
    }
}
