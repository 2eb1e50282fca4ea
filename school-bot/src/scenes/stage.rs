//! Stage: last handler in the chain, dispatches to scenes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{MainMenuScene, RegistrationWizard, Scene};
use crate::core::{Handler, HandlerError, HandlerResponse, Result, UpdateContext};

const CANCEL_COMMAND: &str = "cancel";

/// Routes an update to the scene the user is in, to a scene entered by command, or to the
/// default scene. `/cancel` leaves any scene.
pub struct Stage {
    scenes: HashMap<&'static str, Arc<dyn Scene>>,
    commands: HashMap<&'static str, &'static str>,
    default_scene: Arc<dyn Scene>,
}

impl Stage {
    pub fn new(default_scene: Arc<dyn Scene>) -> Self {
        Self {
            scenes: HashMap::new(),
            commands: HashMap::new(),
            default_scene,
        }
    }

    /// Registers `scene`, entered when the user sends `/<command>`.
    pub fn register(mut self, command: &'static str, scene: Arc<dyn Scene>) -> Self {
        self.commands.insert(command, scene.id());
        self.scenes.insert(scene.id(), scene);
        self
    }

    /// Stage with the built-in scenes: main menu as default, `/register` wizard.
    pub fn with_default_scenes() -> Self {
        Self::new(Arc::new(MainMenuScene)).register(
            RegistrationWizard::COMMAND,
            Arc::new(RegistrationWizard::build()),
        )
    }

    /// Moves the user into scene `id` and runs its entry step.
    pub async fn enter(&self, id: &str, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        let scene = self
            .scenes
            .get(id)
            .ok_or_else(|| HandlerError::UnknownScene(id.to_string()))?;
        ctx.scope.set_tag("scene", scene.id());
        scene.enter(ctx).await
    }
}

#[async_trait]
impl Handler for Stage {
    #[instrument(skip(self, ctx), fields(update_id = ctx.update.update_id))]
    async fn handle(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        // Scenes talk back through `ctx.reply`; with no chat there is nowhere to answer.
        if ctx.update.chat_id().is_none() {
            debug!("Update has no chat, skipping scenes");
            return Ok(HandlerResponse::Ignore);
        }
        let command = ctx.update.command().map(|(name, _)| name.to_string());
        if let Some(name) = command.as_deref() {
            ctx.session.last_command = Some(name.to_string());

            if name == CANCEL_COMMAND {
                let left = ctx.session.scene.take();
                info!(scene = ?left.map(|s| s.id), "step: Stage cancel");
                let text = ctx.config().general.messages.cancelled.clone();
                return ctx.reply(&text).await;
            }
            if let Some(id) = self.commands.get(name).copied() {
                info!(scene = id, "step: Stage entering scene by command");
                return self.enter(id, ctx).await;
            }
        }

        let active = ctx.session.scene.as_ref().map(|s| s.id.clone());
        if let Some(id) = active {
            match self.scenes.get(id.as_str()) {
                Some(scene) => {
                    ctx.scope.set_tag("scene", scene.id());
                    return scene.handle(ctx).await;
                }
                None => {
                    warn!(scene = %id, "Session points at an unregistered scene, resetting");
                    ctx.session.scene = None;
                }
            }
        }

        self.default_scene.handle(ctx).await
    }
}
