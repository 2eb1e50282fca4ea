//! BotConfig: general file + environment + resolved database profile.

use reqwest::Url;

use super::database::{DatabaseProfile, DatabaseProfiles};
use super::env::EnvConfig;
use super::error::ConfigError;
use super::general::GeneralConfig;
use crate::reporting::Dsn;
use crate::telegram::HEALTH_PATH;

/// Immutable bot configuration, loaded once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub general: GeneralConfig,
    pub env: EnvConfig,
    pub database: DatabaseProfile,
}

impl BotConfig {
    /// Loads env, then the general and database files it points to. If `token` is provided
    /// it overrides BOT_TOKEN. Call validate() after load to fail fast before init.
    pub fn load(token: Option<String>) -> Result<Self, ConfigError> {
        let env = EnvConfig::from_env(token)?;
        Self::from_env_config(env)
    }

    pub fn from_env_config(env: EnvConfig) -> Result<Self, ConfigError> {
        let general = GeneralConfig::from_file(&env.config_path)?;
        let database = DatabaseProfiles::from_file(&env.database_config_path)?
            .resolve(&env.app_env, env.database_url.as_deref())?;
        Ok(Self {
            general,
            env,
            database,
        })
    }

    /// Checks every value that would otherwise fail later at a network boundary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.env.webhook_path;
        if !path.starts_with('/') || path.len() < 2 {
            return Err(ConfigError::InvalidEnv {
                name: "WEBHOOK_PATH",
                reason: format!("must start with '/' and not be just '/': {}", path),
            });
        }
        // The path is mounted as a literal route: no router syntax, no empty segments.
        let literal = path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.'));
        if !literal || path.contains("//") || path == HEALTH_PATH {
            return Err(ConfigError::InvalidEnv {
                name: "WEBHOOK_PATH",
                reason: format!(
                    "only A-Z, a-z, 0-9, '/', '_', '-' and '.' without empty segments, \
                     and not {}: {}",
                    HEALTH_PATH, path
                ),
            });
        }
        if self.env.port == 0 {
            return Err(ConfigError::InvalidEnv {
                name: "PORT",
                reason: "must be non-zero".into(),
            });
        }

        let public = Url::parse(&self.general.public_url)
            .map_err(|e| ConfigError::Invalid(format!("public_url: {}", e)))?;
        if public.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "public_url must be https: {}",
                self.general.public_url
            )));
        }

        let redis = Url::parse(&self.env.redis_url).map_err(|e| ConfigError::InvalidEnv {
            name: "REDIS_URL",
            reason: e.to_string(),
        })?;
        if !matches!(redis.scheme(), "redis" | "rediss" | "unix" | "redis+unix") {
            return Err(ConfigError::InvalidEnv {
                name: "REDIS_URL",
                reason: format!("unsupported scheme '{}'", redis.scheme()),
            });
        }

        if let Some(ref url_str) = self.env.telegram_api_url {
            if Url::parse(url_str).is_err() {
                return Err(ConfigError::InvalidEnv {
                    name: "TELEGRAM_API_URL",
                    reason: format!("not a valid URL: {}", url_str),
                });
            }
        }

        if let Some(ref secret) = self.env.webhook_secret_token {
            let valid_chars = secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if secret.len() > 256 || !valid_chars {
                return Err(ConfigError::InvalidEnv {
                    name: "WEBHOOK_SECRET_TOKEN",
                    reason: "1-256 characters of A-Z, a-z, 0-9, _ and - only".into(),
                });
            }
        }

        if let Some(ref dsn) = self.general.sentry_dsn {
            Dsn::parse(dsn).map_err(|e| ConfigError::Invalid(format!("sentry_dsn: {}", e)))?;
        }

        if let Some(ref url) = self.general.trello.api_url {
            Url::parse(url).map_err(|e| ConfigError::Invalid(format!("trello.api_url: {}", e)))?;
        }

        Ok(())
    }

    /// Public URL registered with Telegram: `public_url` + `WEBHOOK_PATH`.
    pub fn webhook_url(&self) -> Result<Url, ConfigError> {
        let base = self.general.public_url.trim_end_matches('/');
        Url::parse(&format!("{}{}", base, self.env.webhook_path))
            .map_err(|e| ConfigError::Invalid(format!("webhook url: {}", e)))
    }

    pub fn bot_token(&self) -> &str {
        &self.env.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.env.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.env.telegram_api_url.as_deref()
    }
}
