//! # school-bot
//!
//! Webhook Telegram bot bootstrap: loads config, migrates the database, configures error
//! reporting, binds external services, builds the handler chain and serves the webhook.

pub mod after_start;
pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod handlers;
pub mod reporting;
pub mod runner;
pub mod scenes;
pub mod services;
pub mod session;
pub mod telegram;

pub use cli::{load_config, load_database_profile, Cli, Commands};

pub use crate::core::{
    init_tracing, Bot, BotError, Chat, Handler, HandlerError, HandlerResponse, IncomingUpdate,
    Result, UpdateContext, UpdateKind, User,
};

pub use after_start::{spawn_post_start, PostStartHook, StartupCheck};
pub use chain::HandlerChain;
pub use components::{bind_services, build_handler_chain};
pub use config::{BotConfig, ConfigError};
pub use reporting::{build_reporter, ErrorReporter, ReportScope, SentryReporter, TracingReporter};
pub use runner::{run_bot, run_migrations_only, store_gdrive_token};
pub use scenes::{MainMenuScene, RegistrationWizard, Scene, Stage, Wizard, WizardAction};
pub use services::BoundServices;
pub use session::{InMemorySessionStore, RedisSessionStore, SessionData, SessionKey, SessionStore};
pub use telegram::{register_webhook, webhook_router, TelegramBotAdapter, WebhookState};
