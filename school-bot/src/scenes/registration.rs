//! `/register`: asks for the user's full name, confirms it and stores it in the session.

use async_trait::async_trait;

use super::wizard::{Wizard, WizardAction, WizardStep};
use crate::config::fill;
use crate::core::{HandlerResponse, Result, UpdateContext};

const FULL_NAME: &str = "full_name";
const MAX_NAME_LEN: usize = 128;

pub struct RegistrationWizard;

impl RegistrationWizard {
    pub const ID: &'static str = "registration";
    pub const COMMAND: &'static str = "register";

    pub fn build() -> Wizard {
        Wizard::new(Self::ID)
            .step(AskFullName)
            .step(ConfirmFullName)
    }
}

fn pending_name(ctx: &UpdateContext) -> Option<String> {
    ctx.session
        .scene
        .as_ref()
        .and_then(|s| s.answers.get(FULL_NAME).cloned())
}

struct AskFullName;

#[async_trait]
impl WizardStep for AskFullName {
    async fn prompt(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        let text = ctx.config().general.messages.ask_full_name.clone();
        ctx.reply(&text).await
    }

    async fn answer(&self, ctx: &mut UpdateContext, text: &str) -> Result<WizardAction> {
        if text.is_empty() || text.starts_with('/') || text.chars().count() > MAX_NAME_LEN {
            self.prompt(ctx).await?;
            return Ok(WizardAction::Stay);
        }
        if let Some(state) = ctx.session.scene.as_mut() {
            state.answers.insert(FULL_NAME.into(), text.to_string());
        }
        Ok(WizardAction::Next)
    }
}

struct ConfirmFullName;

#[async_trait]
impl WizardStep for ConfirmFullName {
    async fn prompt(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse> {
        let name = pending_name(ctx).unwrap_or_default();
        let text = fill(&ctx.config().general.messages.confirm_full_name, &name);
        ctx.reply(&text).await
    }

    async fn answer(&self, ctx: &mut UpdateContext, text: &str) -> Result<WizardAction> {
        match text.to_lowercase().as_str() {
            "yes" | "y" => {
                let name = pending_name(ctx).unwrap_or_default();
                let done = fill(&ctx.config().general.messages.registered, &name);
                ctx.session.full_name = Some(name);
                ctx.reply(&done).await?;
                Ok(WizardAction::Next)
            }
            "no" | "n" => Ok(WizardAction::Back),
            _ => {
                self.prompt(ctx).await?;
                Ok(WizardAction::Stay)
            }
        }
    }
}
