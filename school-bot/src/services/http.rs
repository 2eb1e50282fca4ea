//! Shared response handling for the REST clients.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::core::{BotError, Result};

/// Decodes a JSON body, turning non-2xx statuses into a service error with the body text.
pub(crate) async fn json_or_error<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BotError::service(service, format!("HTTP {}: {}", status, body)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| BotError::service(service, format!("invalid response: {}", e)))
}

pub(crate) fn transport_error(service: &'static str, e: reqwest::Error) -> BotError {
    BotError::service(service, e.to_string())
}
