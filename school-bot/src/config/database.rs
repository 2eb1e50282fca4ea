//! Database connection profiles from `config/database.json`, selected by `APP_ENV`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::env::{DEFAULT_APP_ENV, DEFAULT_DATABASE_CONFIG_PATH};
use super::error::{read_json, ConfigError};

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseProfile {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseProfiles(BTreeMap<String, DatabaseProfile>);

impl DatabaseProfiles {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Picks the profile named `env`; `url_override` (`DATABASE_URL`) replaces its url.
    pub fn resolve(
        &self,
        env: &str,
        url_override: Option<&str>,
    ) -> Result<DatabaseProfile, ConfigError> {
        let mut profile = self
            .0
            .get(env)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProfile(env.to_string()))?;
        if let Some(url) = url_override {
            profile.url = url.to_string();
        }
        Ok(profile)
    }

    /// Resolves the active profile from `DATABASE_CONFIG_PATH`, `APP_ENV` and `DATABASE_URL`
    /// alone, for commands that only touch the database.
    pub fn profile_from_env() -> Result<DatabaseProfile, ConfigError> {
        let get = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let path = get("DATABASE_CONFIG_PATH")
            .unwrap_or_else(|| DEFAULT_DATABASE_CONFIG_PATH.to_string());
        let app_env = get("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string());
        Self::from_file(Path::new(&path))?.resolve(&app_env, get("DATABASE_URL").as_deref())
    }
}
