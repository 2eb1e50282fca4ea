//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{BotConfig, DatabaseProfile, DatabaseProfiles};

#[derive(Parser)]
#[command(name = "school-bot")]
#[command(about = "Webhook Telegram bot for school administration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env and config files; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Apply pending database migrations and exit.
    Migrate,
    /// Store the Google Drive access token obtained from the consent URL.
    GdriveToken {
        /// Access token issued by Google for GDRIVE_OAUTH2_SECRET's client.
        token: String,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    Ok(BotConfig::load(token)?)
}

/// Database profile only; `migrate` does not need the bot's credentials.
pub fn load_database_profile() -> Result<DatabaseProfile> {
    Ok(DatabaseProfiles::profile_from_env()?)
}
