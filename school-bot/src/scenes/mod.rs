//! Multi-step conversation flows and the [`Stage`] that routes updates to them.
//!
//! The user's current scene lives in the session (`SessionData::scene`), so `Stage` must run
//! after `SessionHandler` has loaded it.

mod main_menu;
mod registration;
mod stage;
mod wizard;

use async_trait::async_trait;

use crate::core::{HandlerResponse, Result, UpdateContext};

pub use main_menu::MainMenuScene;
pub use registration::RegistrationWizard;
pub use stage::Stage;
pub use wizard::{Wizard, WizardAction, WizardStep};

/// A named conversation flow a user can be "in".
#[async_trait]
pub trait Scene: Send + Sync {
    fn id(&self) -> &'static str;

    /// Runs when the user enters the scene by its command.
    async fn enter(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse>;

    /// Runs for every update while the user is in the scene.
    async fn handle(&self, ctx: &mut UpdateContext) -> Result<HandlerResponse>;
}
