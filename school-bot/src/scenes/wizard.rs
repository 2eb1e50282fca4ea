//! Wizard: a scene made of ordered steps, each asking one question.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::Scene;
use crate::core::{HandlerResponse, Result, UpdateContext};
use crate::session::SceneState;

/// Where the wizard goes after a step has seen the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    /// Advance and prompt the next step; leaves after the last one.
    Next,
    /// Wait for another answer to the same step.
    Stay,
    /// Return to the previous step and prompt it again.
    Back,
    /// Exit the wizard.
    Leave,
}

#[async_trait]
pub trait WizardStep: Send + Sync {
    /// Asks the step's question.
    async fn prompt(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse>;

    /// Handles the answer (`text` is trimmed, empty for non-text updates).
    async fn answer(&self, ctx: &mut UpdateContext, text: &str) -> Result<WizardAction>;
}

pub struct Wizard {
    id: &'static str,
    steps: Vec<Box<dyn WizardStep>>,
}

impl Wizard {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: impl WizardStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    fn set_step(&self, ctx: &mut UpdateContext, step: usize) {
        if let Some(state) = ctx.session.scene.as_mut() {
            state.step = step;
        }
    }

    async fn prompt(&self, ctx: &mut UpdateContext, step: usize) -> Result<HandlerResponse> {
        match self.steps.get(step) {
            Some(current) => current.prompt(ctx).await,
            None => {
                ctx.session.scene = None;
                Ok(HandlerResponse::Stop)
            }
        }
    }
}

#[async_trait]
impl Scene for Wizard {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn enter(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        ctx.session.scene = Some(SceneState::new(self.id));
        debug!(wizard = self.id, "Entered wizard");
        self.prompt(ctx, 0).await
    }

    async fn handle(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        let step = ctx.session.scene.as_ref().map(|s| s.step).unwrap_or(0);
        let Some(current) = self.steps.get(step) else {
            warn!(wizard = self.id, step, "Stored wizard step out of range, leaving");
            ctx.session.scene = None;
            return Ok(HandlerResponse::Stop);
        };

        let text = ctx.update.text().unwrap_or_default().trim().to_string();
        let action = current.answer(ctx, &text).await?;
        debug!(wizard = self.id, step, action = ?action, "Wizard step answered");

        match action {
            WizardAction::Next if step + 1 >= self.steps.len() => {
                ctx.session.scene = None;
                Ok(HandlerResponse::Stop)
            }
            WizardAction::Next => {
                self.set_step(ctx, step + 1);
                self.prompt(ctx, step + 1).await
            }
            WizardAction::Stay => Ok(HandlerResponse::Stop),
            WizardAction::Back => {
                let previous = step.saturating_sub(1);
                self.set_step(ctx, previous);
                self.prompt(ctx, previous).await
            }
            WizardAction::Leave => {
                ctx.session.scene = None;
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
