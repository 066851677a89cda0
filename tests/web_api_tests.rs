//! Integration tests for the Chroma Palette Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chroma_palette::config::{Environment, StoreKind};
use chroma_palette::services::{GenerateColorRequest, SchemeGenerator, StaticVerifier};
use chroma_palette::web::{create_router, AppState};

mod fixtures;
use fixtures::{memory_config, SCHEME_ANSWER};

struct CannedGenerator(String);

impl SchemeGenerator for CannedGenerator {
    fn generate(&self, _request: &GenerateColorRequest) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

struct BrokenGenerator;

impl SchemeGenerator for BrokenGenerator {
    fn generate(&self, _request: &GenerateColorRequest) -> anyhow::Result<String> {
        anyhow::bail!("upstream returned 500")
    }
}

/// Creates a test AppState with an in-memory usage store.
fn create_test_state() -> AppState {
    AppState::new(&memory_config()).expect("Failed to create app state")
}

/// Creates a test AppState that can generate palettes.
fn create_generating_state() -> AppState {
    create_test_state().with_generator(Arc::new(CannedGenerator(SCHEME_ANSWER.to_string())))
}

fn generate_body() -> Value {
    json!({
        "imageBase64": "iVBORw0KGgo=",
        "mimeType": "image/png",
        "turnstileToken": "token"
    })
}

/// Helper to make a GET request and get the response body as JSON.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with a JSON body, optionally from a given IP.
async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: Value,
    client_ip: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(ip) = client_ip {
        builder = builder.header("cf-connecting-ip", ip);
    }

    let response = app
        .clone()
        .oneshot(
            builder
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router(create_test_state());

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

// ============================================================================
// Usage Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_usage_check_fresh_client() {
    let app = create_router(create_test_state());

    let (status, json) = post_json(&app, "/api/usage/check", json!({}), Some("1.2.3.4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["remaining"], 3);
    assert_eq!(json["total"], 3);
    assert_eq!(json["canUseBonus"], true);
    assert!(json["resetAt"].as_str().unwrap().ends_with("T00:00:00.000Z"));
}

#[tokio::test]
async fn test_usage_consume_until_exhausted() {
    let app = create_router(create_test_state());

    let mut results = Vec::new();
    for _ in 0..4 {
        let (status, json) =
            post_json(&app, "/api/usage/consume", json!({}), Some("1.2.3.4")).await;
        assert_eq!(status, StatusCode::OK);
        results.push((json["success"].as_bool().unwrap(), json["remaining"].as_u64().unwrap()));
    }

    assert_eq!(results, vec![(true, 2), (true, 1), (true, 0), (false, 0)]);
}

#[tokio::test]
async fn test_usage_claim_bonus_once() {
    let app = create_router(create_test_state());

    let (_, first) = post_json(&app, "/api/usage/claim-bonus", json!({}), Some("1.2.3.4")).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["message"], "Successfully claimed +1 quota!");

    let (_, second) = post_json(&app, "/api/usage/claim-bonus", json!({}), Some("1.2.3.4")).await;
    assert_eq!(second["success"], false);
    assert_eq!(second["message"], "Share bonus already claimed today");

    let (_, status) = post_json(&app, "/api/usage/check", json!({}), Some("1.2.3.4")).await;
    assert_eq!(status["total"], 4);
    assert_eq!(status["canUseBonus"], false);
}

#[tokio::test]
async fn test_usage_is_per_client() {
    let app = create_router(create_test_state());

    post_json(&app, "/api/usage/consume", json!({}), Some("1.1.1.1")).await;

    let (_, other) = post_json(&app, "/api/usage/check", json!({}), Some("2.2.2.2")).await;
    assert_eq!(other["remaining"], 3);

    // No headers at all counts as localhost
    let (_, local) = post_json(&app, "/api/usage/check", json!({}), None).await;
    assert_eq!(local["remaining"], 3);
}

#[tokio::test]
async fn test_usage_disabled_store_fails_open() {
    let mut config = memory_config();
    config.usage.store = StoreKind::Disabled;
    let app = create_router(AppState::new(&config).unwrap());

    for _ in 0..5 {
        let (_, json) = post_json(&app, "/api/usage/consume", json!({}), Some("1.2.3.4")).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["remaining"], 2);
    }

    let (_, bonus) = post_json(&app, "/api/usage/claim-bonus", json!({}), Some("1.2.3.4")).await;
    assert_eq!(bonus["message"], "Successfully claimed +1 quota! (Fallback)");
}

#[tokio::test]
async fn test_usage_file_store_through_router() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("usage.json");
    let mut config = memory_config();
    config.usage.store = StoreKind::File;
    config.usage.store_path = Some(store_path.clone());
    let app = create_router(AppState::new(&config).unwrap());

    let (status, json) = post_json(&app, "/api/usage/consume", json!({}), Some("9.9.9.9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["remaining"], 2);

    let (_, bonus) = post_json(&app, "/api/usage/claim-bonus", json!({}), Some("9.9.9.9")).await;
    assert_eq!(bonus["success"], true);

    let (_, check) = post_json(&app, "/api/usage/check", json!({}), Some("9.9.9.9")).await;
    assert_eq!(check["remaining"], 3);
    assert_eq!(check["total"], 4);

    let raw = std::fs::read_to_string(&store_path).unwrap();
    assert!(raw.contains("ip:9.9.9.9"));
}

// ============================================================================
// Color Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_color_shades() {
    let app = create_router(create_test_state());

    let (status, json) =
        post_json(&app, "/api/colors/shades", json!({"hex": "#3b82f6"}), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hex"], "#3B82F6");
    assert_eq!(json["shades"]["500"], "#3B82F6");
    assert_eq!(json["shades"]["50"], "#F5F9FF");
    assert_eq!(json["shades"]["950"], "#13223E");
    assert_eq!(json["shades"].as_object().unwrap().len(), 11);
}

#[tokio::test]
async fn test_color_shades_invalid_hex() {
    let app = create_router(create_test_state());

    let (status, json) = post_json(&app, "/api/colors/shades", json!({"hex": "#XYZ"}), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid color");
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn test_color_contrast() {
    let app = create_router(create_test_state());

    let (status, json) = post_json(
        &app,
        "/api/colors/contrast",
        json!({"foreground": "#000000", "background": "#FFFFFF"}),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!((json["ratio"].as_f64().unwrap() - 21.0).abs() < 1e-9);
    assert_eq!(json["rating"]["score"], "AAA");
    assert_eq!(json["rating"]["label"], "Excellent");
    assert_eq!(json["rating"]["pass"], true);
}

#[tokio::test]
async fn test_color_contrast_default_background() {
    let app = create_router(create_test_state());

    let (status, json) =
        post_json(&app, "/api/colors/contrast", json!({"foreground": "#3B82F6"}), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["background"], "#000000");
}

#[tokio::test]
async fn test_color_dark_variant() {
    let app = create_router(create_test_state());

    let (status, json) = post_json(
        &app,
        "/api/colors/dark-variant",
        json!({"hex": "#FFFFFF", "role": "background"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["darkHex"], "#0F1729");
    assert_eq!(json["category"], "background");

    let (_, json) =
        post_json(&app, "/api/colors/dark-variant", json!({"hex": "#1A334D"}), None).await;
    assert_eq!(json["darkHex"], "#6C98C6");
    assert_eq!(json["category"], "brand");
}

// ============================================================================
// Export Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_palette_export_formats() {
    let app = create_router(create_test_state());
    let colors = json!([
        {"id": "a", "name": "Deep Blue", "hex": "#3B82F6", "darkHex": "#6CA1F8", "role": "primary"}
    ]);

    let (status, json) = post_json(
        &app,
        "/api/palette/export",
        json!({"colors": colors, "format": "tailwind"}),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let code = json["code"].as_str().unwrap();
    assert!(code.contains("@theme {"));
    assert!(code.contains("--color-deep-blue-500: #3B82F6;"));

    let (_, json) = post_json(
        &app,
        "/api/palette/export",
        json!({"colors": colors, "format": "css"}),
        None,
    )
    .await;
    assert!(json["code"].as_str().unwrap().contains(":root {"));

    let (_, json) = post_json(
        &app,
        "/api/palette/export",
        json!({"colors": colors, "format": "json"}),
        None,
    )
    .await;
    let shades: Value = serde_json::from_str(json["code"].as_str().unwrap()).unwrap();
    assert_eq!(shades["deepBlue"]["500"], "#3B82F6");
}

#[tokio::test]
async fn test_palette_export_unknown_format() {
    let app = create_router(create_test_state());

    let (status, _) = post_json(
        &app,
        "/api/palette/export",
        json!({"colors": [], "format": "scss"}),
        None,
    )
    .await;

    assert!(status.is_client_error());
}

// ============================================================================
// Generation Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_generate_without_generator() {
    let app = create_router(create_test_state());

    let (status, json) = post_json(&app, "/api/scheme/generate", generate_body(), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_generate_success_spends_quota() {
    let app = create_router(create_generating_state());

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mood"], "Coastal Calm");
    assert_eq!(json["remaining"], 2);

    let colors = json["colors"].as_array().unwrap();
    let roles: Vec<&str> = colors.iter().map(|c| c["role"].as_str().unwrap()).collect();
    assert_eq!(
        roles,
        vec!["primary", "secondary", "accent", "background", "surface", "text"]
    );
    assert_eq!(colors[3]["darkHex"], "#0F1729");
    assert!(colors.iter().all(|c| c["id"].as_str().is_some_and(|id| !id.is_empty())));

    let (_, usage) = post_json(&app, "/api/usage/check", json!({}), Some("5.5.5.5")).await;
    assert_eq!(usage["remaining"], 2);
}

#[tokio::test]
async fn test_generate_quota_exhausted() {
    let app = create_router(create_generating_state());
    for _ in 0..3 {
        post_json(&app, "/api/usage/consume", json!({}), Some("5.5.5.5")).await;
    }

    let (status, _) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_generate_missing_token() {
    let app = create_router(create_generating_state());
    let mut body = generate_body();
    body["turnstileToken"] = Value::Null;

    let (status, json) = post_json(&app, "/api/scheme/generate", body, Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Turnstile token is required");
}

#[tokio::test]
async fn test_generate_production_without_secret_is_rejected() {
    let mut config = memory_config();
    config.server.environment = Environment::Production;
    let state = AppState::new(&config)
        .unwrap()
        .with_generator(Arc::new(CannedGenerator(SCHEME_ANSWER.to_string())));
    let app = create_router(state);

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Turnstile validation failed: missing-secret-key");
}

#[tokio::test]
async fn test_generate_with_custom_verifier() {
    let state = create_generating_state()
        .with_verifier(Arc::new(StaticVerifier::reject_all(["timeout-or-duplicate"])));
    let app = create_router(state);

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Turnstile validation failed: timeout-or-duplicate");
}

#[tokio::test]
async fn test_generate_upstream_failure_keeps_quota() {
    let state = create_test_state().with_generator(Arc::new(BrokenGenerator));
    let app = create_router(state);

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("5.5.5.5")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Failed to generate color scheme");

    let (_, usage) = post_json(&app, "/api/usage/check", json!({}), Some("5.5.5.5")).await;
    assert_eq!(usage["remaining"], 3);
}

#[tokio::test]
async fn test_generate_missing_image() {
    let app = create_router(create_generating_state());
    let mut body = generate_body();
    body["imageBase64"] = json!("");

    let (status, _) = post_json(&app, "/api/scheme/generate", body, Some("5.5.5.5")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_with_configured_turnstile_and_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/turnstile/siteverify"))
        .and(body_string_contains("secret=turnstile-secret"))
        .and(body_string_contains("remoteip=6.6.6.6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": SCHEME_ANSWER } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = memory_config();
    config.server.environment = Environment::Production;
    config.captcha.secret_key = Some("turnstile-secret".to_string());
    config.captcha.verify_url = format!("{}/turnstile/siteverify", server.uri());
    config.ai.api_key = Some("sk-test".to_string());
    config.ai.base_url = format!("{}/v1", server.uri());
    let app = create_router(AppState::new(&config).unwrap());

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("6.6.6.6")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mood"], "Coastal Calm");
    assert_eq!(json["colors"].as_array().unwrap().len(), 6);
    assert_eq!(json["remaining"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_turnstile_rejection_from_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/siteverify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error-codes": ["invalid-input-response"]
        })))
        .mount(&server)
        .await;

    let mut config = memory_config();
    config.captcha.secret_key = Some("turnstile-secret".to_string());
    config.captcha.verify_url = format!("{}/siteverify", server.uri());
    let state = AppState::new(&config)
        .unwrap()
        .with_generator(Arc::new(CannedGenerator(SCHEME_ANSWER.to_string())));
    let app = create_router(state);

    let (status, json) =
        post_json(&app, "/api/scheme/generate", generate_body(), Some("6.6.6.6")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Turnstile validation failed: invalid-input-response");
}
