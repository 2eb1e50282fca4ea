//! Webhook endpoint and Telegram API tests. Telegram requests go to a local mockito server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockito::Matcher;
use school_bot::telegram::SECRET_TOKEN_HEADER;
use school_bot::{
    build_handler_chain, register_webhook, webhook_router, Bot, InMemorySessionStore,
    TelegramBotAdapter, WebhookState,
};
use tower::ServiceExt;

mod common;
use common::{
    init_tracing, memory_database, test_config, test_services, text_update, RecordingBot,
    RecordingReporter, TEST_BOT_TOKEN,
};

struct Endpoint {
    router: axum::Router,
    bot: Arc<RecordingBot>,
    reporter: Arc<RecordingReporter>,
}

async fn endpoint(secret_token: Option<&str>) -> Endpoint {
    init_tracing();
    let database = memory_database().await;
    let services = test_services(test_config(None, vec![]), Arc::new(InMemorySessionStore::new()));
    let reporter = Arc::new(RecordingReporter::new());
    let bot = Arc::new(RecordingBot::new());
    let state = WebhookState {
        chain: build_handler_chain(&database, &services, reporter.clone()),
        services,
        bot: bot.clone(),
        secret_token: secret_token.map(str::to_string),
    };
    Endpoint {
        router: webhook_router("/hook-test", state),
        bot,
        reporter,
    }
}

fn post(body: impl Into<Body>, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/hook-test")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_TOKEN_HEADER, secret);
    }
    builder.body(body.into()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let ep = endpoint(None).await;
    let response = ep
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_is_dispatched() {
    let ep = endpoint(Some("s3cret")).await;
    let body = text_update(1, 42, "/start").to_string();

    let response = ep.router.oneshot(post(body, Some("s3cret"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ep.bot.texts_to(42).len(), 1);
    assert!(ep.reporter.captured().is_empty());
}

#[tokio::test]
async fn test_wrong_or_missing_secret_rejected() {
    let ep = endpoint(Some("s3cret")).await;
    let body = text_update(1, 42, "/start").to_string();

    let response = ep
        .router
        .clone()
        .oneshot(post(body.clone(), Some("guess")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ep.router.oneshot(post(body, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(ep.bot.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_are_acknowledged_and_dropped() {
    let ep = endpoint(None).await;

    let response = ep
        .router
        .clone()
        .oneshot(post("not json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ep
        .router
        .oneshot(post(r#"{"message": {"text": "no update id"}}"#, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(ep.bot.sent().is_empty());
    assert!(ep.reporter.captured().is_empty());
}

#[tokio::test]
async fn test_other_paths_not_found() {
    let ep = endpoint(None).await;
    let request = Request::builder()
        .method("POST")
        .uri("/other")
        .body(Body::from("{}"))
        .unwrap();
    let response = ep.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Matches `/bot<token>/<method>` regardless of method-name casing.
fn telegram_method(method: &str) -> Matcher {
    Matcher::Regex(format!("(?i)^/bot{}/{}$", TEST_BOT_TOKEN, method))
}

fn mock_bot(server: &mockito::ServerGuard) -> teloxide::Bot {
    teloxide::Bot::new(TEST_BOT_TOKEN).set_api_url(reqwest::Url::parse(&server.url()).unwrap())
}

#[tokio::test]
async fn test_register_webhook() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", telegram_method("setwebhook"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": true, "description": "Webhook was set"}"#)
        .create_async()
        .await;

    let url = reqwest::Url::parse("https://bot.example.com/hook-test").unwrap();
    register_webhook(&mock_bot(&server), url, Some("s3cret"))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_register_webhook_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", telegram_method("setwebhook"))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: bad webhook: HTTPS url must be provided for webhook"}"#)
        .create_async()
        .await;

    let url = reqwest::Url::parse("https://bot.example.com/hook-test").unwrap();
    let err = register_webhook(&mock_bot(&server), url, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("set_webhook failed"));
}

#[tokio::test]
async fn test_adapter_sends_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", telegram_method("sendmessage"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "ok": true,
            "result": {
                "message_id": 31,
                "date": 1706529600,
                "chat": {"id": 123, "type": "private"},
                "from": {"id": 123456789, "is_bot": true, "first_name": "TestBot", "username": "testbot"},
                "text": "hello"
            }
        }"#,
        )
        .create_async()
        .await;

    let adapter = TelegramBotAdapter::new(mock_bot(&server));
    adapter.send_message(123, "hello").await.unwrap();
    mock.assert_async().await;
}
