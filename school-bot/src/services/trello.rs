//! Trello REST client (project tracker).

use reqwest::Client;
use serde::Deserialize;

use super::http::{json_or_error, transport_error};
use crate::config::TrelloConfig;
use crate::core::Result;

const SERVICE: &str = "trello";
const TRELLO_API: &str = "https://api.trello.com";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloMember {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub name: String,
    pub desc: Option<String>,
}

pub struct TrelloClient {
    http: Client,
    api_url: String,
    key: String,
    token: String,
    board_id: Option<String>,
}

impl TrelloClient {
    pub fn from_config(config: &TrelloConfig) -> Self {
        let api_url = config
            .api_url
            .as_deref()
            .unwrap_or(TRELLO_API)
            .trim_end_matches('/')
            .to_string();
        Self {
            http: Client::new(),
            api_url,
            key: config.api_key.clone(),
            token: config.token.clone(),
            board_id: config.board_id.clone(),
        }
    }

    pub fn default_board(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    fn auth(&self) -> [(&'static str, &str); 2] {
        [("key", self.key.as_str()), ("token", self.token.as_str())]
    }

    /// Member that owns the configured token; doubles as a credentials check.
    pub async fn whoami(&self) -> Result<TrelloMember> {
        let response = self
            .http
            .get(format!("{}/1/members/me", self.api_url))
            .query(&self.auth())
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        json_or_error(SERVICE, response).await
    }

    pub async fn board_lists(&self, board_id: &str) -> Result<Vec<TrelloList>> {
        let response = self
            .http
            .get(format!("{}/1/boards/{}/lists", self.api_url, board_id))
            .query(&self.auth())
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        json_or_error(SERVICE, response).await
    }

    pub async fn create_card(&self, list_id: &str, card: &NewCard) -> Result<TrelloCard> {
        let mut params = vec![("idList", list_id), ("name", card.name.as_str())];
        if let Some(desc) = card.desc.as_deref() {
            params.push(("desc", desc));
        }
        let response = self
            .http
            .post(format!("{}/1/cards", self.api_url))
            .query(&self.auth())
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;
        json_or_error(SERVICE, response).await
    }
}
