//! Post-start hook: runs once the webhook listener is accepting connections.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::core::{Bot, Result};
use crate::reporting::{ErrorReporter, ReportScope};
use crate::services::BoundServices;

#[async_trait]
pub trait PostStartHook: Send + Sync {
    async fn run(&self, services: &BoundServices) -> Result<()>;
}

/// Default hook: checks the session store and Trello credentials, logs whether Drive is
/// authorized, then tells the admin chats the bot is up.
pub struct StartupCheck {
    bot: Arc<dyn Bot>,
}

impl StartupCheck {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl PostStartHook for StartupCheck {
    #[instrument(skip(self, services))]
    async fn run(&self, services: &BoundServices) -> Result<()> {
        services.session_store.ping().await?;
        info!("step: after_start session store reachable");

        let member = services.trello.whoami().await?;
        info!(trello_user = %member.username, "step: after_start project tracker reachable");

        if services.drive.is_authorized().await {
            info!("step: after_start file storage authorized");
        } else {
            let url = services.drive.authorize_url("startup")?;
            warn!(authorize_url = %url, "Google Drive is not authorized yet");
        }

        let general = &services.config.general;
        for chat_id in &general.admin_chat_ids {
            if let Err(e) = self.bot.send_message(*chat_id, &general.messages.startup_notice).await
            {
                warn!(chat_id, error = %e, "Failed to send startup notice");
            }
        }
        Ok(())
    }
}

/// Runs `hook` on its own task. A failure is reported with a fresh scope and never stops the
/// server.
pub fn spawn_post_start(
    hook: Arc<dyn PostStartHook>,
    services: Arc<BoundServices>,
    reporter: Arc<dyn ErrorReporter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = hook.run(&services).await {
            warn!(error = %e, "Post-start hook failed");
            let mut scope = ReportScope::default();
            scope.set_tag("phase", "after_start");
            reporter.capture(&e, &scope).await;
        }
    })
}
