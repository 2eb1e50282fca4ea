//! Shared fakes and builders for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use school_bot::config::{BotConfig, DatabaseProfile, EnvConfig, GeneralConfig};
use school_bot::services::{BoundServices, DriveClient, TrelloClient};
use school_bot::telegram::TelegramUpdate;
use school_bot::{
    Bot, BotError, ErrorReporter, IncomingUpdate, ReportScope, SessionStore, UpdateContext,
};
use storage::Database;
use tracing_subscriber::{fmt, EnvFilter};

/// Teloxide request path format is `/bot<token>/<method>`.
pub const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

const GDRIVE_SECRET: &str =
    r#"{"installed":{"client_id":"cid","client_secret":"cs","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once per test process; output goes to the test console.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,school_bot=debug,storage=debug"));
        let _ = fmt().with_env_filter(env_filter).with_test_writer().try_init();
    });
}

/// Bot that records outgoing messages instead of calling Telegram.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> school_bot::Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Reporter that keeps every captured error with a copy of its scope.
#[derive(Default)]
pub struct RecordingReporter {
    captured: Mutex<Vec<(String, ReportScope)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Vec<(String, ReportScope)> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorReporter for RecordingReporter {
    async fn capture(&self, error: &BotError, scope: &ReportScope) {
        self.captured
            .lock()
            .unwrap()
            .push((error.to_string(), scope.clone()));
    }
}

/// BotConfig built without touching the process environment.
pub fn test_config(trello_api_url: Option<String>, admin_chat_ids: Vec<i64>) -> BotConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("WEBHOOK_PATH", "/hook-test".to_string()),
        ("PORT", "8443".to_string()),
        ("REDIS_URL", "redis://127.0.0.1:6379/0".to_string()),
        ("GDRIVE_OAUTH2_SECRET", GDRIVE_SECRET.to_string()),
        ("APP_ENV", "test".to_string()),
    ]);
    let env = EnvConfig::from_lookup(Some(TEST_BOT_TOKEN.to_string()), |name| {
        vars.get(name).cloned()
    })
    .unwrap();

    let general: GeneralConfig = serde_json::from_value(serde_json::json!({
        "public_url": "https://bot.example.com",
        "admin_chat_ids": admin_chat_ids,
        "trello": { "api_key": "key1", "token": "tok1", "api_url": trello_api_url }
    }))
    .unwrap();

    BotConfig {
        general,
        env,
        database: DatabaseProfile {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
    }
}

pub async fn memory_database() -> Database {
    Database::connect_and_migrate("sqlite::memory:", 1)
        .await
        .unwrap()
}

pub fn test_services(config: BotConfig, store: Arc<dyn SessionStore>) -> Arc<BoundServices> {
    let drive = DriveClient::new(config.env.gdrive_secret.clone());
    let trello = TrelloClient::from_config(&config.general.trello);
    Arc::new(BoundServices {
        session_store: store,
        drive: Arc::new(drive),
        trello: Arc::new(trello),
        config: Arc::new(config),
    })
}

/// Telegram JSON for a private text message from `user_id`.
pub fn text_update(update_id: i64, user_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1706529600,
            "from": {"id": user_id, "is_bot": false, "first_name": "Pupil", "username": format!("pupil{}", user_id)},
            "chat": {"id": user_id, "type": "private"},
            "text": text
        }
    })
}

pub fn context(
    raw: serde_json::Value,
    services: Arc<BoundServices>,
    bot: Arc<dyn Bot>,
) -> UpdateContext {
    let update: IncomingUpdate = serde_json::from_value::<TelegramUpdate>(raw.clone())
        .unwrap()
        .into();
    UpdateContext::new(update, raw, services, bot)
}
