//! Startup sequence. Every step must succeed before the next begins; the first failure ends
//! startup with the error.

use std::sync::Arc;

use anyhow::{Context, Result};
use storage::{Database, MigrationReport};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::after_start::{spawn_post_start, PostStartHook};
use crate::components::{bind_services, build_handler_chain};
use crate::config::{BotConfig, DatabaseProfile};
use crate::core::{init_tracing, Bot};
use crate::reporting::build_reporter;
use crate::services::GDRIVE_SERVICE;
use crate::telegram::{
    build_teloxide_bot, register_webhook, webhook_router, TelegramBotAdapter, WebhookState,
};

/// Main entry: validate config, init logging and error reporting, migrate, bind services,
/// build the chain, register the webhook, then serve. `make_hook` receives the outbound bot
/// and returns the hook run once the listener is bound.
#[instrument(skip(config, make_hook))]
pub async fn run_bot<F>(config: BotConfig, make_hook: F) -> Result<()>
where
    F: FnOnce(Arc<dyn Bot>) -> Arc<dyn PostStartHook>,
{
    config.validate()?;
    init_tracing(config.log_file())?;
    let reporter = build_reporter(&config)?;

    info!(
        app_env = %config.env.app_env,
        port = config.env.port,
        webhook_path = %config.env.webhook_path,
        "step: initializing bot"
    );

    let database = Database::connect_and_migrate(
        &config.database.url,
        config.database.max_connections,
    )
    .await
    .context("Database initialization failed")?;

    let config = Arc::new(config);
    let services = Arc::new(bind_services(config.clone(), &database).await?);
    let chain = build_handler_chain(&database, &services, reporter.clone());
    info!(handlers = ?chain.handler_names(), "step: handler chain built");

    let teloxide_bot = build_teloxide_bot(&config);
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let webhook_url = config.webhook_url()?;
    register_webhook(
        &teloxide_bot,
        webhook_url,
        config.env.webhook_secret_token.as_deref(),
    )
    .await?;

    let state = WebhookState {
        chain,
        services: services.clone(),
        bot: bot.clone(),
        secret_token: config.env.webhook_secret_token.clone(),
    };
    let app = webhook_router(&config.env.webhook_path, state);

    let listener = TcpListener::bind(("0.0.0.0", config.env.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.env.port))?;
    info!(port = config.env.port, "step: webhook listener bound");

    spawn_post_start(make_hook(bot), services, reporter);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    database.close().await;
    Ok(())
}

/// Applies pending migrations for `profile` and exits.
#[instrument(skip(profile))]
pub async fn run_migrations_only(profile: &DatabaseProfile) -> Result<MigrationReport> {
    let database = Database::connect_and_migrate(&profile.url, profile.max_connections)
        .await
        .context("Migration failed")?;
    let report = database.migration_report();
    database.close().await;
    Ok(report)
}

/// Stores the Google Drive access token obtained through the consent URL, replacing any
/// previous one. The bot loads it on the next start.
#[instrument(skip(profile, token))]
pub async fn store_gdrive_token(profile: &DatabaseProfile, token: &str) -> Result<()> {
    let token = token.trim();
    anyhow::ensure!(!token.is_empty(), "Google Drive token must not be empty");
    let database = Database::connect_and_migrate(&profile.url, profile.max_connections)
        .await
        .context("Failed to open database")?;
    let stored = database.service_tokens().put(GDRIVE_SERVICE, token).await;
    database.close().await;
    stored.context("Failed to store Google Drive token")?;
    info!("Stored Google Drive token");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}
