//! Error types for the bot core.
//!
//! [`BotError`] is what handlers return and what the error reporter receives;
//! [`HandlerError`] covers failures that originate inside a handler's own logic.

use thiserror::Error;

/// Top-level per-update error (database, session, external service, transport, handler).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Service error ({service}): {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BotError {
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            service,
            message: message.into(),
        }
    }

    /// Short variant name used as the exception type in error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "DatabaseError",
            Self::Session(_) => "SessionError",
            Self::Service { .. } => "ServiceError",
            Self::Bot(_) => "BotError",
            Self::Handler(_) => "HandlerError",
            Self::Unknown(_) => "UnknownError",
        }
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    #[error("State error: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
