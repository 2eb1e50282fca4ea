//! Component factory: binds external services and assembles the handler chain. Keeps
//! assembly out of the runner so tests can build the same chain around fakes.

use std::sync::Arc;

use anyhow::{Context, Result};
use storage::Database;
use tracing::{info, instrument};

use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::handlers::{AttachUserHandler, ErrorScopeHandler, ReferralHandler, SessionHandler};
use crate::reporting::ErrorReporter;
use crate::scenes::Stage;
use crate::services::{BoundServices, DriveClient, TrelloClient};
use crate::session::{RedisSessionStore, SessionStore};

/// Connects the session store and builds the file-storage and project-tracker clients.
/// Called once; the result is shared by every update.
#[instrument(skip(config, database))]
pub async fn bind_services(config: Arc<BotConfig>, database: &Database) -> Result<BoundServices> {
    let session_store: Arc<dyn SessionStore> = Arc::new(
        RedisSessionStore::connect(&config.env.redis_url, config.general.session_ttl_secs)
            .await
            .context("Failed to connect session store")?,
    );

    let drive = DriveClient::bind(config.env.gdrive_secret.clone(), &database.service_tokens())
        .await
        .context("Failed to bind Google Drive client")?;
    let trello = TrelloClient::from_config(&config.general.trello);

    let services = BoundServices {
        session_store,
        drive: Arc::new(drive),
        trello: Arc::new(trello),
        config,
    };
    info!(
        drive_authorized = services.drive.is_authorized().await,
        "Services bound: session_store, file_storage, project_tracker, config"
    );
    Ok(services)
}

/// Handler chain in its fixed order: error scope, user, session, referral, scenes.
pub fn build_handler_chain(
    database: &Database,
    services: &BoundServices,
    reporter: Arc<dyn ErrorReporter>,
) -> HandlerChain {
    HandlerChain::new(reporter)
        .add_handler(Arc::new(ErrorScopeHandler::new()))
        .add_handler(Arc::new(AttachUserHandler::new(database.users())))
        .add_handler(Arc::new(SessionHandler::new(services.session_store.clone())))
        .add_handler(Arc::new(ReferralHandler::new(database.users())))
        .add_handler(Arc::new(Stage::with_default_scenes()))
}
