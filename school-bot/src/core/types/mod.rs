//! Core types: user, chat, inbound update, handler response, and Handler trait.
//!
//! One file per main type.

mod chat;
mod handler;
mod response;
mod update;
mod user;

pub use chat::Chat;
pub use handler::Handler;
pub use response::HandlerResponse;
pub use update::{IncomingUpdate, UpdateKind};
pub use user::User;
