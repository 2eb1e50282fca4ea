//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code sends messages via
//! Telegram; tests substitute a recording Bot.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::core::{Bot as CoreBot, BotError, Result};

/// teloxide Bot for the configured token, pointed at `TELEGRAM_API_URL` when set.
pub fn build_teloxide_bot(config: &BotConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token());
    let Some(url_str) = config.telegram_api_url() else {
        return bot;
    };
    match reqwest::Url::parse(url_str) {
        Ok(url) => {
            info!(url = %url, "Using custom Telegram API url");
            bot.set_api_url(url)
        }
        Err(e) => {
            warn!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
            bot
        }
    }
}

pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn bot_error(e: teloxide::RequestError) -> BotError {
    warn!(error = %e, "Telegram request failed");
    BotError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}
