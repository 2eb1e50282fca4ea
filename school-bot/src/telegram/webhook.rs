//! Webhook registration and the axum endpoint Telegram posts updates to.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use reqwest::Url;
use teloxide::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::adapters::TelegramUpdate;
use crate::chain::HandlerChain;
use crate::core::{Bot as CoreBot, BotError, IncomingUpdate, Result, UpdateContext};
use crate::services::BoundServices;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";
pub const HEALTH_PATH: &str = "/health";

/// Tells Telegram where to deliver updates. Replies are sent as separate API calls, never in
/// the webhook response body.
#[instrument(skip(bot, secret_token), fields(url = %url))]
pub async fn register_webhook(
    bot: &teloxide::Bot,
    url: Url,
    secret_token: Option<&str>,
) -> Result<()> {
    let mut request = bot.set_webhook(url);
    if let Some(secret) = secret_token {
        request = request.secret_token(secret.to_string());
    }
    request
        .await
        .map_err(|e| BotError::Bot(format!("set_webhook failed: {}", e)))?;
    info!("Webhook registered");
    Ok(())
}

/// Everything a webhook request needs to run one update through the chain.
#[derive(Clone)]
pub struct WebhookState {
    pub chain: HandlerChain,
    pub services: Arc<BoundServices>,
    pub bot: Arc<dyn CoreBot>,
    pub secret_token: Option<String>,
}

/// `POST <path>` receives updates, `GET /health` answers 200. `path` must have passed
/// `BotConfig::validate`.
pub fn webhook_router(path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Always 200 once the secret matches: Telegram retries non-2xx responses, and a payload that
/// failed once would fail again.
async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = state.secret_token.as_deref() {
        let given = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(expected) {
            warn!("Rejected webhook request with missing or wrong secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, len = body.len(), "Dropping webhook body that is not JSON");
            return StatusCode::OK;
        }
    };
    let update: IncomingUpdate = match serde_json::from_value::<TelegramUpdate>(raw.clone()) {
        Ok(update) => update.into(),
        Err(e) => {
            warn!(error = %e, "Dropping malformed Telegram update");
            return StatusCode::OK;
        }
    };

    debug!(update_id = update.update_id, "Received update");
    let mut ctx = UpdateContext::new(update, raw, state.services.clone(), state.bot.clone());
    state.chain.dispatch(&mut ctx).await;
    StatusCode::OK
}
