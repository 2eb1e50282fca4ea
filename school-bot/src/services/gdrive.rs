//! Google Drive client (file storage).
//!
//! OAuth client credentials come from `GDRIVE_OAUTH2_SECRET`. The consent URL is built here,
//! but the token exchange happens out-of-band; the resulting access token is stored in
//! `service_tokens` under [`GDRIVE_SERVICE`] and loaded by [`DriveClient::bind`].

use std::fmt;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use storage::ServiceTokenRepository;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::http::{json_or_error, transport_error};
use crate::core::{BotError, Result};

pub const GDRIVE_SERVICE: &str = "gdrive";

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const OOB_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".into()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

/// OAuth client credentials as downloaded from the Google console.
#[derive(Clone, Deserialize)]
pub struct OAuthSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
enum Envelope {
    #[serde(rename = "installed")]
    Installed(OAuthSecret),
    #[serde(rename = "web")]
    Web(OAuthSecret),
}

impl OAuthSecret {
    /// Accepts the console's `{"installed": {...}}` / `{"web": {...}}` envelope or a bare object.
    pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        match serde_json::from_str::<Envelope>(raw) {
            Ok(Envelope::Installed(secret)) | Ok(Envelope::Web(secret)) => Ok(secret),
            Err(_) => serde_json::from_str::<OAuthSecret>(raw),
        }
    }
}

impl fmt::Debug for OAuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFolder<'a> {
    name: &'a str,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
}

pub struct DriveClient {
    http: Client,
    secret: OAuthSecret,
    api_url: String,
    access_token: RwLock<Option<String>>,
}

impl DriveClient {
    pub fn new(secret: OAuthSecret) -> Self {
        Self {
            http: Client::new(),
            secret,
            api_url: DRIVE_API.to_string(),
            access_token: RwLock::new(None),
        }
    }

    /// Points the client at another API root (tests, proxies).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the client and loads a previously stored access token, if any.
    #[instrument(skip(secret, tokens))]
    pub async fn bind(secret: OAuthSecret, tokens: &ServiceTokenRepository) -> Result<Self> {
        let client = Self::new(secret);
        if let Some(stored) = tokens.get(GDRIVE_SERVICE).await? {
            client.set_access_token(stored.token).await;
            info!(updated_at = %stored.updated_at, "Loaded stored Google Drive token");
        } else {
            info!("No Google Drive token stored yet");
        }
        Ok(client)
    }

    /// Consent URL an admin opens to grant Drive access.
    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        let redirect = self
            .secret
            .redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(OOB_REDIRECT);
        Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", redirect),
                ("response_type", "code"),
                ("scope", DRIVE_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .map_err(|e| BotError::service(GDRIVE_SERVICE, format!("auth_uri: {}", e)))
    }

    pub async fn set_access_token(&self, token: String) {
        *self.access_token.write().await = Some(token);
    }

    pub async fn is_authorized(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    async fn bearer(&self) -> Result<String> {
        self.access_token
            .read()
            .await
            .clone()
            .ok_or_else(|| BotError::service(GDRIVE_SERVICE, "not authorized"))
    }

    /// Non-trashed files directly inside `folder_id`.
    pub async fn list_folder(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        let token = self.bearer().await?;
        let query = format!("'{}' in parents and trashed = false", folder_id.replace('\'', "\\'"));
        let response = self
            .http
            .get(format!("{}/files", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name,mimeType,webViewLink)"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(GDRIVE_SERVICE, e))?;
        let list: FileList = json_or_error(GDRIVE_SERVICE, response).await?;
        Ok(list.files)
    }

    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> Result<DriveFile> {
        let token = self.bearer().await?;
        let body = NewFolder {
            name,
            mime_type: FOLDER_MIME,
            parents: parent.into_iter().collect(),
        };
        let response = self
            .http
            .post(format!("{}/files", self.api_url))
            .bearer_auth(token)
            .query(&[("fields", "id,name,mimeType,webViewLink")])
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(GDRIVE_SERVICE, e))?;
        json_or_error(GDRIVE_SERVICE, response).await
    }
}
