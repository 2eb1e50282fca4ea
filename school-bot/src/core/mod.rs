//! Core types and traits: Handler, Bot, IncomingUpdate, UpdateContext, HandlerResponse, error, logger.
//! Transport-agnostic.

pub mod bot;
pub mod context;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use context::UpdateContext;
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, IncomingUpdate, UpdateKind, User};
