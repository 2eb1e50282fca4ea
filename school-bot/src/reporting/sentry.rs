//! Sentry-compatible reporter: posts each event as a single-item envelope to the project's
//! envelope endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ErrorReporter, ReportScope};
use crate::core::BotError;

const CLIENT_NAME: &str = concat!("school-bot/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const ENVELOPE_CONTENT_TYPE: &str = "application/x-sentry-envelope";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("not a URL: {0}")]
    Url(String),
    #[error("missing public key")]
    MissingKey,
    #[error("missing host")]
    MissingHost,
    #[error("missing project id")]
    MissingProject,
}

/// Parsed `<scheme>://<public_key>@<host>[:port]/[prefix/]<project_id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    public_key: String,
    host: String,
    port: Option<u16>,
    path_prefix: String,
    project_id: String,
}

impl Dsn {
    pub fn parse(raw: &str) -> Result<Self, DsnError> {
        let url = Url::parse(raw).map_err(|e| DsnError::Url(e.to_string()))?;
        if url.username().is_empty() {
            return Err(DsnError::MissingKey);
        }
        let host = url.host_str().ok_or(DsnError::MissingHost)?.to_string();

        let path = url.path().trim_end_matches('/');
        let (prefix, project) = path.rsplit_once('/').unwrap_or(("", path));
        if project.is_empty() {
            return Err(DsnError::MissingProject);
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            public_key: url.username().to_string(),
            host,
            port: url.port(),
            path_prefix: prefix.to_string(),
            project_id: project.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn envelope_url(&self) -> String {
        let port = self.port.map(|p| format!(":{}", p)).unwrap_or_default();
        format!(
            "{}://{}{}{}/api/{}/envelope/",
            self.scheme, self.host, port, self.path_prefix, self.project_id
        )
    }

    fn auth_header(&self) -> String {
        format!(
            "Sentry sentry_version=7, sentry_client={}, sentry_key={}",
            CLIENT_NAME, self.public_key
        )
    }
}

#[derive(Debug, Serialize)]
struct Event<'a> {
    event_id: String,
    timestamp: String,
    level: &'static str,
    platform: &'static str,
    logger: &'static str,
    release: &'static str,
    environment: &'a str,
    exception: ExceptionList,
    extra: &'a std::collections::BTreeMap<String, serde_json::Value>,
    tags: &'a std::collections::BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<EventUser>,
}

#[derive(Debug, Serialize)]
struct ExceptionList {
    values: Vec<Exception>,
}

#[derive(Debug, Serialize)]
struct Exception {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct EventUser {
    id: String,
}

/// Envelope body: header line, item header line, event payload.
fn envelope(event: &Event<'_>) -> serde_json::Result<Vec<u8>> {
    let payload = serde_json::to_vec(event)?;
    let header = serde_json::json!({
        "event_id": event.event_id,
        "sent_at": Utc::now().to_rfc3339(),
    });
    let item = serde_json::json!({ "type": "event", "length": payload.len() });

    let mut body = serde_json::to_vec(&header)?;
    body.push(b'\n');
    body.extend(serde_json::to_vec(&item)?);
    body.push(b'\n');
    body.extend(payload);
    body.push(b'\n');
    Ok(body)
}

pub struct SentryReporter {
    client: Client,
    dsn: Dsn,
    environment: String,
}

impl SentryReporter {
    pub fn new(dsn: Dsn, environment: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            dsn,
            environment,
        }
    }

    fn event<'a>(&'a self, err: &BotError, scope: &'a ReportScope) -> Event<'a> {
        Event {
            event_id: Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            level: "error",
            platform: "other",
            logger: "school-bot",
            release: CLIENT_NAME,
            environment: &self.environment,
            exception: ExceptionList {
                values: vec![Exception {
                    kind: err.kind().to_string(),
                    value: err.to_string(),
                }],
            },
            extra: &scope.extras,
            tags: &scope.tags,
            user: scope.user_id.map(|id| EventUser { id: id.to_string() }),
        }
    }
}

#[async_trait]
impl ErrorReporter for SentryReporter {
    async fn capture(&self, err: &BotError, scope: &ReportScope) {
        let event = self.event(err, scope);
        let event_id = event.event_id.clone();
        let body = match envelope(&event) {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    event_id = %event_id,
                    encode_error = %e,
                    error = %err,
                    "Error report not encoded"
                );
                return;
            }
        };

        let result = self
            .client
            .post(self.dsn.envelope_url())
            .header("X-Sentry-Auth", self.dsn.auth_header())
            .header(reqwest::header::CONTENT_TYPE, ENVELOPE_CONTENT_TYPE)
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(event_id = %event_id, error = %err, "Error reported");
            }
            Ok(response) => {
                warn!(
                    event_id = %event_id,
                    status = %response.status(),
                    error = %err,
                    "Error report rejected"
                );
            }
            Err(e) => {
                warn!(event_id = %event_id, send_error = %e, error = %err, "Error report failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_parse_dsn() {
        let dsn = Dsn::parse("https://abc123@o1.ingest.sentry.io/1862805").unwrap();
        assert_eq!(dsn.host(), "o1.ingest.sentry.io");
        assert_eq!(dsn.project_id(), "1862805");
        assert_eq!(
            dsn.envelope_url(),
            "https://o1.ingest.sentry.io/api/1862805/envelope/"
        );
    }

    #[test]
    fn test_parse_dsn_with_port_and_prefix() {
        let dsn = Dsn::parse("http://key@localhost:9000/sentry/7").unwrap();
        assert_eq!(
            dsn.envelope_url(),
            "http://localhost:9000/sentry/api/7/envelope/"
        );
    }

    #[test]
    fn test_parse_dsn_errors() {
        assert!(matches!(Dsn::parse("nonsense"), Err(DsnError::Url(_))));
        assert_eq!(
            Dsn::parse("https://sentry.io/1"),
            Err(DsnError::MissingKey)
        );
        assert_eq!(
            Dsn::parse("https://key@sentry.io/"),
            Err(DsnError::MissingProject)
        );
    }

    #[test]
    fn test_envelope_has_header_item_and_event_lines() {
        let dsn = Dsn::parse("https://key@sentry.io/3").unwrap();
        let reporter = SentryReporter::new(dsn, "production".into());
        let mut scope = ReportScope::default();
        scope.set_tag("scene", "registration");
        scope.set_user(77);
        let err = BotError::Session("redis down".into());
        let event = reporter.event(&err, &scope);

        let body = envelope(&event).unwrap();
        let lines: Vec<&[u8]> = body.split(|b| *b == b'\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].is_empty());

        let header: serde_json::Value = serde_json::from_slice(lines[0]).unwrap();
        assert_eq!(header["event_id"], event.event_id.as_str());
        let item: serde_json::Value = serde_json::from_slice(lines[1]).unwrap();
        assert_eq!(item["type"], "event");
        assert_eq!(item["length"], lines[2].len());

        let payload: serde_json::Value = serde_json::from_slice(lines[2]).unwrap();
        assert_eq!(payload["event_id"], header["event_id"]);
        assert_eq!(payload["environment"], "production");
        assert_eq!(payload["exception"]["values"][0]["type"], "SessionError");
        assert_eq!(payload["tags"]["scene"], "registration");
        assert_eq!(payload["user"]["id"], "77");
    }

    #[tokio::test]
    async fn test_capture_posts_envelope_with_scope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/42/envelope/")
            .match_header("x-sentry-auth", Matcher::Regex("sentry_key=pubkey".into()))
            .match_header("content-type", ENVELOPE_CONTENT_TYPE)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"\{"length":\d+,"type":"event"\}"#.into()),
                Matcher::Regex(r#""environment":"test""#.into()),
                Matcher::Regex(
                    r#""values":\[\{"type":"SessionError","value":"Session error: redis down"\}\]"#
                        .into(),
                ),
                Matcher::Regex(r#""extra":\{"update":\{"update_id":9\}\}"#.into()),
                Matcher::Regex(r#""tags":\{"scene":"registration"\}"#.into()),
                Matcher::Regex(r#""user":\{"id":"77"\}"#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":"x"}"#)
            .expect(1)
            .create_async()
            .await;

        let dsn = Dsn::parse(&format!("http://pubkey@{}/42", server.host_with_port())).unwrap();
        let reporter = SentryReporter::new(dsn, "test".into());

        let mut scope = ReportScope::default();
        scope.set_extra("update", serde_json::json!({ "update_id": 9 }));
        scope.set_tag("scene", "registration");
        scope.set_user(77);

        reporter
            .capture(&BotError::Session("redis down".into()), &scope)
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_capture_swallows_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/1/envelope/")
            .with_status(500)
            .create_async()
            .await;

        let dsn = Dsn::parse(&format!("http://k@{}/1", server.host_with_port())).unwrap();
        SentryReporter::new(dsn, "test".into())
            .capture(&BotError::Unknown("boom".into()), &ReportScope::default())
            .await;

        mock.assert_async().await;
    }
}
