//! Telegram update JSON to [`IncomingUpdate`].
//!
//! Only the fields the bot routes on are modelled; everything else in the payload is ignored
//! and stays available through the raw JSON kept on the context.

use serde::Deserialize;

use crate::core::{Chat, IncomingUpdate, UpdateKind, User};

#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    message: Option<TgMessage>,
    #[serde(default)]
    edited_message: Option<TgMessage>,
    #[serde(default)]
    callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    message_id: i32,
    #[serde(default)]
    from: Option<TgUser>,
    chat: TgChat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    #[serde(default)]
    is_bot: bool,
    first_name: String,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TgCallbackQuery {
    id: String,
    from: TgUser,
    #[serde(default)]
    message: Option<TgMessage>,
    #[serde(default)]
    data: Option<String>,
}

impl From<TgUser> for User {
    fn from(u: TgUser) -> Self {
        User {
            id: u.id,
            is_bot: u.is_bot,
            username: u.username,
            first_name: Some(u.first_name),
            last_name: u.last_name,
            language_code: u.language_code,
        }
    }
}

impl From<TgChat> for Chat {
    fn from(c: TgChat) -> Self {
        Chat {
            id: c.id,
            chat_type: c.kind,
        }
    }
}

impl From<TelegramUpdate> for IncomingUpdate {
    fn from(update: TelegramUpdate) -> Self {
        let update_id = update.update_id;
        if let Some(msg) = update.message {
            return IncomingUpdate {
                update_id,
                from: msg.from.map(User::from),
                chat: Some(msg.chat.into()),
                kind: UpdateKind::Message {
                    message_id: msg.message_id,
                    text: msg.text,
                },
            };
        }
        if let Some(query) = update.callback_query {
            return IncomingUpdate {
                update_id,
                from: Some(query.from.into()),
                chat: query.message.map(|m| m.chat.into()),
                kind: UpdateKind::CallbackQuery {
                    id: query.id,
                    data: query.data,
                },
            };
        }
        // Edits keep their sender so the user is still attached, but are not routed.
        let (from, chat) = match update.edited_message {
            Some(msg) => (msg.from.map(User::from), Some(msg.chat.into())),
            None => (None, None),
        };
        IncomingUpdate {
            update_id,
            from,
            chat,
            kind: UpdateKind::Other,
        }
    }
}
