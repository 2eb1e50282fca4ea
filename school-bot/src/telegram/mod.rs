//! Telegram layer: update parsing, the teloxide-backed [`crate::core::Bot`], webhook
//! registration and the HTTP endpoint that receives updates.

mod adapters;
mod bot_adapter;
mod webhook;

pub use adapters::TelegramUpdate;
pub use bot_adapter::{build_teloxide_bot, TelegramBotAdapter};
pub use webhook::{
    register_webhook, webhook_router, WebhookState, HEALTH_PATH, SECRET_TOKEN_HEADER,
};
