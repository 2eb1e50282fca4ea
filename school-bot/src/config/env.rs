//! Environment-supplied settings: Telegram connection, webhook, Redis, Google Drive
//! credentials, database profile selection and file locations.

use std::env;
use std::path::PathBuf;

use super::error::ConfigError;
use crate::services::OAuthSecret;

pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_LOG_FILE: &str = "logs/school-bot.log";
pub const DEFAULT_CONFIG_PATH: &str = "config/general.json";
pub const DEFAULT_DATABASE_CONFIG_PATH: &str = "config/database.json";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// WEBHOOK_PATH, e.g. `/hook-3f9c`
    pub webhook_path: String,
    /// PORT
    pub port: u16,
    /// REDIS_URL
    pub redis_url: String,
    /// GDRIVE_OAUTH2_SECRET (JSON blob)
    pub gdrive_secret: OAuthSecret,
    /// APP_ENV, selects the database profile
    pub app_env: String,
    /// DATABASE_URL, overrides the profile url
    pub database_url: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// WEBHOOK_SECRET_TOKEN, checked against `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret_token: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// CONFIG_PATH
    pub config_path: PathBuf,
    /// DATABASE_CONFIG_PATH
    pub database_config_path: PathBuf,
}

impl EnvConfig {
    /// Loads from process environment. `token` overrides BOT_TOKEN if provided.
    pub fn from_env(token: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(token, |name| env::var(name).ok())
    }

    /// Loads using `lookup` for every variable; empty values count as unset.
    pub fn from_lookup<F>(token: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingEnv(name));

        let bot_token = match token {
            Some(token) => token,
            None => require("BOT_TOKEN")?,
        };
        let webhook_path = require("WEBHOOK_PATH")?;
        let port = require("PORT")?
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnv {
                name: "PORT",
                reason: e.to_string(),
            })?;
        let redis_url = require("REDIS_URL")?;
        let gdrive_secret = OAuthSecret::from_json(&require("GDRIVE_OAUTH2_SECRET")?).map_err(
            |e| ConfigError::InvalidEnv {
                name: "GDRIVE_OAUTH2_SECRET",
                reason: e.to_string(),
            },
        )?;

        Ok(Self {
            bot_token,
            webhook_path,
            port,
            redis_url,
            gdrive_secret,
            app_env: get("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            database_url: get("DATABASE_URL"),
            telegram_api_url: get("TELEGRAM_API_URL").or_else(|| get("TELOXIDE_API_URL")),
            webhook_secret_token: get("WEBHOOK_SECRET_TOKEN"),
            log_file: get("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            config_path: get("CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
                .into(),
            database_config_path: get("DATABASE_CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_CONFIG_PATH.to_string())
                .into(),
        })
    }
}
