//! Transport-agnostic inbound update.

use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// One inbound event delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingUpdate {
    pub update_id: i64,
    pub from: Option<User>,
    pub chat: Option<Chat>,
    pub kind: UpdateKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    Message {
        message_id: i32,
        text: Option<String>,
    },
    CallbackQuery {
        id: String,
        data: Option<String>,
    },
    /// Any update type the bot does not route (edited messages, polls, ...).
    Other,
}

impl IncomingUpdate {
    /// Message text, or callback data for button presses.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            UpdateKind::Message { text, .. } => text.as_deref(),
            UpdateKind::CallbackQuery { data, .. } => data.as_deref(),
            UpdateKind::Other => None,
        }
    }

    /// Splits `/command@botname payload` into `("command", Some("payload"))`.
    /// Returns None when the text is not a command.
    pub fn command(&self) -> Option<(&str, Option<&str>)> {
        let text = match &self.kind {
            UpdateKind::Message { text, .. } => text.as_deref()?,
            _ => return None,
        };
        let rest = text.trim().strip_prefix('/')?;
        let (head, payload) = match rest.split_once(char::is_whitespace) {
            Some((head, payload)) => (head, Some(payload.trim()).filter(|p| !p.is_empty())),
            None => (rest, None),
        };
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some((name, payload))
    }

    pub fn sender_id(&self) -> Option<i64> {
        self.from.as_ref().map(|u| u.id)
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.chat.as_ref().map(|c| c.id)
    }
}
