//! Config tests.

use std::collections::HashMap;
use std::env;
use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use super::{BotConfig, ConfigError, EnvConfig};

const GDRIVE_SECRET: &str = r#"{"installed":{"client_id":"cid.apps.googleusercontent.com","client_secret":"csecret","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#;

const ALL_VARS: &[&str] = &[
    "BOT_TOKEN",
    "WEBHOOK_PATH",
    "PORT",
    "REDIS_URL",
    "GDRIVE_OAUTH2_SECRET",
    "APP_ENV",
    "DATABASE_URL",
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "WEBHOOK_SECRET_TOKEN",
    "LOG_FILE",
    "CONFIG_PATH",
    "DATABASE_CONFIG_PATH",
];

fn json_file(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

fn general_file() -> NamedTempFile {
    json_file(serde_json::json!({
        "public_url": "https://bot.example.com/",
        "admin_chat_ids": [1, 2],
        "trello": { "api_key": "key", "token": "token" }
    }))
}

fn database_file() -> NamedTempFile {
    json_file(serde_json::json!({
        "development": { "url": "sqlite://./data/dev.db" },
        "test": { "url": "sqlite::memory:", "max_connections": 1 }
    }))
}

fn base_vars(general: &NamedTempFile, database: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        ("BOT_TOKEN", "test_token".to_string()),
        ("WEBHOOK_PATH", "/secret-path".to_string()),
        ("PORT", "8443".to_string()),
        ("REDIS_URL", "redis://127.0.0.1:6379/0".to_string()),
        ("GDRIVE_OAUTH2_SECRET", GDRIVE_SECRET.to_string()),
        ("CONFIG_PATH", general.path().display().to_string()),
        (
            "DATABASE_CONFIG_PATH",
            database.path().display().to_string(),
        ),
    ])
}

fn load_with(vars: &HashMap<&'static str, String>) -> Result<BotConfig, ConfigError> {
    let env = EnvConfig::from_lookup(None, |name| vars.get(name).cloned())?;
    BotConfig::from_env_config(env)
}

#[test]
fn test_load_with_defaults() {
    let (general, database) = (general_file(), database_file());
    let config = load_with(&base_vars(&general, &database)).unwrap();

    assert_eq!(config.bot_token(), "test_token");
    assert_eq!(config.env.port, 8443);
    assert_eq!(config.env.app_env, "development");
    assert_eq!(config.database.url, "sqlite://./data/dev.db");
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.log_file(), "logs/school-bot.log");
    assert!(config.telegram_api_url().is_none());
    assert!(config.env.webhook_secret_token.is_none());
    assert_eq!(config.general.admin_chat_ids, vec![1, 2]);
    assert_eq!(config.env.gdrive_secret.client_id, "cid.apps.googleusercontent.com");
    config.validate().unwrap();
}

#[test]
fn test_webhook_url_joins_public_url_and_path() {
    let (general, database) = (general_file(), database_file());
    let config = load_with(&base_vars(&general, &database)).unwrap();
    assert_eq!(
        config.webhook_url().unwrap().as_str(),
        "https://bot.example.com/secret-path"
    );
}

#[test]
fn test_profile_selected_by_app_env_and_overridden_by_database_url() {
    let (general, database) = (general_file(), database_file());
    let mut vars = base_vars(&general, &database);
    vars.insert("APP_ENV", "test".into());
    let config = load_with(&vars).unwrap();
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.database.max_connections, 1);

    vars.insert("DATABASE_URL", "sqlite://override.db".into());
    let config = load_with(&vars).unwrap();
    assert_eq!(config.database.url, "sqlite://override.db");
}

#[test]
fn test_each_required_var_is_enforced() {
    let (general, database) = (general_file(), database_file());
    for missing in ["BOT_TOKEN", "WEBHOOK_PATH", "PORT", "REDIS_URL", "GDRIVE_OAUTH2_SECRET"] {
        let mut vars = base_vars(&general, &database);
        vars.remove(missing);
        match load_with(&vars) {
            Err(ConfigError::MissingEnv(name)) => assert_eq!(name, missing),
            other => panic!("expected MissingEnv({}), got {:?}", missing, other.map(|_| ())),
        }
    }
}

#[test]
fn test_token_override_skips_bot_token_var() {
    let (general, database) = (general_file(), database_file());
    let mut vars = base_vars(&general, &database);
    vars.remove("BOT_TOKEN");
    let env = EnvConfig::from_lookup(Some("override".into()), |name| vars.get(name).cloned())
        .unwrap();
    assert_eq!(env.bot_token, "override");
}

#[test]
fn test_malformed_inputs_fail() {
    let (general, database) = (general_file(), database_file());

    let mut vars = base_vars(&general, &database);
    vars.insert("PORT", "eighty".into());
    assert!(matches!(
        load_with(&vars),
        Err(ConfigError::InvalidEnv { name: "PORT", .. })
    ));

    let mut vars = base_vars(&general, &database);
    vars.insert("GDRIVE_OAUTH2_SECRET", "{not json".into());
    assert!(matches!(
        load_with(&vars),
        Err(ConfigError::InvalidEnv {
            name: "GDRIVE_OAUTH2_SECRET",
            ..
        })
    ));

    let mut vars = base_vars(&general, &database);
    vars.insert("CONFIG_PATH", "/definitely/not/here.json".into());
    assert!(matches!(load_with(&vars), Err(ConfigError::Read { .. })));

    let broken = json_file(serde_json::json!({ "public_url": "https://x" }));
    let mut vars = base_vars(&general, &database);
    vars.insert("CONFIG_PATH", broken.path().display().to_string());
    assert!(matches!(load_with(&vars), Err(ConfigError::Parse { .. })));
}

#[test]
fn test_validate_rejects_bad_values() {
    let (general, database) = (general_file(), database_file());
    let base = load_with(&base_vars(&general, &database)).unwrap();

    let mut config = base.clone();
    config.env.webhook_path = "no-slash".into();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.general.public_url = "http://insecure.example.com".into();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.env.redis_url = "http://not-redis".into();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.env.telegram_api_url = Some("not-a-valid-url".into());
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.env.webhook_secret_token = Some("has spaces".into());
    assert!(config.validate().is_err());

    let mut config = base;
    config.general.sentry_dsn = Some("nonsense".into());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_webhook_paths_with_route_syntax() {
    let (general, database) = (general_file(), database_file());
    let base = load_with(&base_vars(&general, &database)).unwrap();

    for path in [
        "/hook/*",
        "/hook/*rest",
        "/hook/:secret",
        "/hook/{secret}",
        "/hook//x",
        "/hook?x=1",
        "/hook path",
        "/health",
    ] {
        let mut config = base.clone();
        config.env.webhook_path = path.into();
        assert!(
            matches!(
                config.validate(),
                Err(ConfigError::InvalidEnv {
                    name: "WEBHOOK_PATH",
                    ..
                })
            ),
            "{} should be rejected",
            path
        );
    }

    for path in ["/hook-3f9c", "/bot/updates_v2", "/a.b"] {
        let mut config = base.clone();
        config.env.webhook_path = path.into();
        assert!(config.validate().is_ok(), "{} should be accepted", path);
    }
}

#[test]
#[serial]
fn test_load_from_process_env_fails_without_required_var() {
    for name in ALL_VARS {
        env::remove_var(name);
    }
    let (general, database) = (general_file(), database_file());
    for (name, value) in base_vars(&general, &database) {
        env::set_var(name, value);
    }
    env::remove_var("REDIS_URL");

    let result = BotConfig::load(None);
    assert!(matches!(result, Err(ConfigError::MissingEnv("REDIS_URL"))));

    env::set_var("REDIS_URL", "redis://127.0.0.1/");
    assert!(BotConfig::load(None).is_ok());

    for name in ALL_VARS {
        env::remove_var(name);
    }
}
