//! Default scene for users who are not inside any flow.

use async_trait::async_trait;

use super::Scene;
use crate::core::{HandlerResponse, Result, UpdateContext};

#[derive(Clone, Default)]
pub struct MainMenuScene;

impl MainMenuScene {
    pub const ID: &'static str = "main_menu";
}

#[async_trait]
impl Scene for MainMenuScene {
    fn id(&self) -> &'static str {
        Self::ID
    }

    async fn enter(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        self.handle(ctx).await
    }

    async fn handle(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        if ctx.update.text().is_none() || ctx.update.chat_id().is_none() {
            return Ok(HandlerResponse::Ignore);
        }
        let messages = &ctx.config().general.messages;
        let text = match ctx.update.command() {
            Some(("start", _)) => messages.greeting.clone(),
            Some(("help", _)) => messages.help.clone(),
            _ => messages.unknown.clone(),
        };
        ctx.reply(&text).await
    }
}
