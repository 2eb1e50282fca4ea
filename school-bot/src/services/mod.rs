//! External service clients bound once at startup and shared by every update.

mod gdrive;
mod http;
mod trello;

use std::sync::Arc;

use crate::config::BotConfig;
use crate::session::SessionStore;

pub use gdrive::{DriveClient, DriveFile, OAuthSecret, GDRIVE_SERVICE};
pub use trello::{NewCard, TrelloCard, TrelloClient, TrelloList, TrelloMember};

/// Live service instances, created once and held for the process lifetime: session store,
/// file storage, project tracking, config. Nothing else is bound.
#[derive(Clone)]
pub struct BoundServices {
    pub session_store: Arc<dyn SessionStore>,
    pub drive: Arc<DriveClient>,
    pub trello: Arc<TrelloClient>,
    pub config: Arc<BotConfig>,
}
