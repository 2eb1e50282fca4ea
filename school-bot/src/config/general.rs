//! General bot settings from `config/general.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{read_json, ConfigError};

const REDACTED: &str = "***";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Public HTTPS base URL; the webhook path is appended to it.
    pub public_url: String,
    /// Error-reporting DSN. Errors are only logged when unset.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
    /// Chats notified once the bot is up.
    #[serde(default)]
    pub admin_chat_ids: Vec<i64>,
    /// Session expiry in the session store; sessions never expire when unset.
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,
    pub trello: TrelloConfig,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrelloConfig {
    pub api_key: String,
    pub token: String,
    #[serde(default)]
    pub board_id: Option<String>,
    /// Overrides `https://api.trello.com`.
    #[serde(default)]
    pub api_url: Option<String>,
}

/// User-facing texts. `{name}` is replaced where noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub greeting: String,
    pub help: String,
    pub unknown: String,
    pub ask_full_name: String,
    /// `{name}`
    pub confirm_full_name: String,
    /// `{name}`
    pub registered: String,
    pub cancelled: String,
    pub startup_notice: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            greeting: "Hi! Send /register to sign up or /help to see what I can do.".into(),
            help: "/register - sign up\n/cancel - abort the current step\n/help - this message"
                .into(),
            unknown: "Sorry, I did not understand that. Try /help.".into(),
            ask_full_name: "What is your full name?".into(),
            confirm_full_name: "Is \"{name}\" correct? Reply yes or no.".into(),
            registered: "Thanks, {name}! You are registered.".into(),
            cancelled: "Cancelled.".into(),
            startup_notice: "Bot started.".into(),
        }
    }
}

impl GeneralConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Config snapshot for error reports, with credentials masked.
    pub fn redacted(&self) -> serde_json::Value {
        let mut copy = self.clone();
        copy.trello.api_key = REDACTED.into();
        copy.trello.token = REDACTED.into();
        if copy.sentry_dsn.is_some() {
            copy.sentry_dsn = Some(REDACTED.into());
        }
        serde_json::to_value(copy).unwrap_or(serde_json::Value::Null)
    }
}

pub(crate) fn fill(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}
