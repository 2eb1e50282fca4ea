//! Bot configuration: general JSON file + database profile + environment variables.
//!
//! Everything is assembled once into [`BotConfig`] and validated before any network
//! listener binds.

mod bot_config;
mod database;
mod env;
mod error;
mod general;

#[cfg(test)]
mod tests;

pub use bot_config::BotConfig;
pub use database::{DatabaseProfile, DatabaseProfiles};
pub use env::{EnvConfig, DEFAULT_LOG_FILE};
pub use error::ConfigError;
pub use general::{GeneralConfig, Messages, TrelloConfig};
pub(crate) use general::fill;
