//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finease_core::test_utils::{ChatReply, MockChatServer, MockUpstreamServer, UpstreamFixture};
use finease_core::{AIClient, MockBackend, ModelConfig, Suggestion, SuggestionType, UpstreamClient};
use http_body_util::BodyExt;
use tower::ServiceExt;

const TEST_KEY: &str = "test-service-key";

fn fixture() -> UpstreamFixture {
    UpstreamFixture::new(
        serde_json::json!({
            "success": true,
            "data": [{"day": "2024-03-01", "expenses": [
                {"amount": 1200, "category": {"_id": "c1", "title": "Travel"}}
            ]}]
        }),
        serde_json::json!({
            "success": true,
            "categories": [{"_id": "c1", "title": "Travel", "limit": 1000}]
        }),
    )
}

fn auth_config() -> ServerConfig {
    ServerConfig {
        require_auth: true,
        api_keys: vec![TEST_KEY.to_string()],
        ..Default::default()
    }
}

fn setup_test_app(upstream_url: &str, ai: Option<AIClient>) -> Router {
    let engine = SuggestionEngine::with_parts(UpstreamClient::new(upstream_url), ai);
    create_router(engine, auth_config())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn suggestions_request(token: Option<&str>, key: Option<&str>) -> Request<Body> {
    let uri = match token {
        Some(t) => format!("/suggestions?token={}", t),
        None => "/suggestions".to_string(),
    };
    let mut builder = Request::builder().uri(uri);
    if let Some(k) = key {
        builder = builder.header(API_KEY_HEADER, k);
    }
    builder.body(Body::empty()).unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app("http://127.0.0.1:9", None);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "Suggestion API is running.");
}

// ========== Authorization ==========

#[tokio::test]
async fn test_missing_api_key_rejected_before_fetch() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let app = setup_test_app(&upstream.url(), None);

    let response = app
        .oneshot(suggestions_request(Some("user-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Unauthorized");
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_wrong_api_key_rejected() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let app = setup_test_app(&upstream.url(), None);

    let response = app
        .oneshot(suggestions_request(Some("user-token"), Some("nope")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_no_configured_keys_rejects_everything() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let engine = SuggestionEngine::with_parts(UpstreamClient::new(&upstream.url()), None);
    let app = create_router(engine, ServerConfig::default());

    let response = app
        .oneshot(suggestions_request(Some("user-token"), Some("")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_disabled() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let engine = SuggestionEngine::with_parts(UpstreamClient::new(&upstream.url()), None);
    let config = ServerConfig {
        require_auth: false,
        ..Default::default()
    };
    let app = create_router(engine, config);

    let response = app
        .oneshot(suggestions_request(Some("user-token"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["alpha".to_string(), "beta-key".to_string()];
    assert!(validate_api_key("alpha", &keys));
    assert!(validate_api_key("beta-key", &keys));
    assert!(!validate_api_key("alph", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("alpha", &[]));
}

#[test]
fn test_parse_api_keys() {
    assert_eq!(parse_api_keys(" a, b ,,c "), vec!["a", "b", "c"]);
    assert!(parse_api_keys("").is_empty());
}

// ========== Suggestions ==========

#[tokio::test]
async fn test_suggestions_rule_based_then_generated() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let ai = AIClient::Mock(MockBackend::with_suggestions(vec![Suggestion::new(
        SuggestionType::Info,
        "Book early",
        "Flights are cheaper in advance.",
    )]));
    let app = setup_test_app(&upstream.url(), Some(ai));

    let response = app
        .oneshot(suggestions_request(Some("user-token"), Some(TEST_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let suggestions = json["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["type"], "error");
    assert_eq!(suggestions[0]["title"], "Travel budget exceeded");
    assert_eq!(
        suggestions[0]["details"],
        "You have exceeded your budget for Travel!"
    );
    assert_eq!(suggestions[1]["type"], "info");
    assert_eq!(suggestions[1]["title"], "Book early");

    let seen = upstream.requests();
    assert_eq!(seen.len(), 2);
    assert!(seen
        .iter()
        .all(|r| r.authorization.as_deref() == Some("Bearer user-token")));
}

#[tokio::test]
async fn test_suggestions_model_down_still_ok() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let chat = MockChatServer::start(ChatReply::Status(500)).await;
    let ai = AIClient::from_config(&ModelConfig::new("sk-fake").with_base_url(&chat.url()));
    let app = setup_test_app(&upstream.url(), Some(ai));

    let response = app
        .oneshot(suggestions_request(Some("user-token"), Some(TEST_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_suggestions_upstream_failure_is_bad_gateway() {
    let upstream = MockUpstreamServer::start(fixture().failing_expenses(500)).await;
    let app = setup_test_app(&upstream.url(), Some(AIClient::mock()));

    let response = app
        .oneshot(suggestions_request(Some("user-token"), Some(TEST_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Failed to fetch data from backend");
}

#[tokio::test]
async fn test_suggestions_missing_token() {
    let upstream = MockUpstreamServer::start(fixture()).await;
    let app = setup_test_app(&upstream.url(), None);

    let response = app
        .oneshot(suggestions_request(None, Some(TEST_KEY)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let engine = SuggestionEngine::with_parts(UpstreamClient::new("http://127.0.0.1:9"), None);
    let config = ServerConfig {
        allowed_origins: vec!["https://finease.app".to_string()],
        ..auth_config()
    };
    let app = create_router(engine, config);

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/suggestions")
            .header("origin", origin)
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(preflight("https://finease.app"))
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://finease.app")
    );

    let other = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(other.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_preflight_allows_api_key_header() {
    let app = setup_test_app("http://127.0.0.1:9", None);

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/suggestions")
                .header("origin", "https://finease.example")
                .header("access-control-request-method", "GET")
                .header("access-control-request-headers", "x-api-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
