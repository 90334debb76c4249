// ABOUTME: Shared helpers for integration tests
// ABOUTME: In-memory store wiring plus an in-process mock of the WakaTime endpoints
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use wakatime_bridge::config::environment::{OAuthCredentials, ServerConfig};
use wakatime_bridge::database::{LinkStore, SqliteStore};
use wakatime_bridge::models::{AuthSession, LinkedProfile};
use wakatime_bridge::provider::WakaTimeClient;
use wakatime_bridge::resources::ServerResources;

/// Canned responses served by the mock provider
pub struct MockProvider {
    pub token_status: u16,
    pub token_body: String,
    pub revoke_status: u16,
    pub user_body: serde_json::Value,
    pub stats_body: serde_json::Value,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_body: token_ok_body("tok1", "U1", Utc::now() + Duration::hours(6)),
            revoke_status: 200,
            user_body: json!({ "data": { "id": "U1", "username": "waka-user" } }),
            stats_body: json!({ "data": {
                "human_readable_range": "Last 7 Days",
                "human_readable_total_including_other_language": "5 hrs 30 mins",
                "username": "waka-user",
                "languages": [
                    { "name": "Rust", "percent": 80.0, "text": "4 hrs 24 mins", "total_seconds": 15840.0 },
                    { "name": "TOML", "percent": 20.0, "text": "1 hr 6 mins", "total_seconds": 3960.0 }
                ],
                "editors": [
                    { "name": "VS Code", "percent": 100.0, "text": "5 hrs 30 mins", "total_seconds": 19800.0 }
                ]
            }}),
        }
    }
}

/// Form-encoded success payload the token endpoint answers with
pub fn token_ok_body(access_token: &str, uid: &str, expires_at: DateTime<Utc>) -> String {
    serde_urlencoded::to_string([
        ("access_token", access_token),
        ("refresh_token", "ref1"),
        ("uid", uid),
        ("token_type", "bearer"),
        ("expires_at", &expires_at.to_rfc3339()),
        ("scope", "read_summaries,read_stats"),
    ])
    .unwrap()
}

/// Form-encoded OAuth error payload
pub fn token_error_body(error: &str, description: &str) -> String {
    serde_urlencoded::to_string([("error", error), ("error_description", description)]).unwrap()
}

async fn token(State(mock): State<Arc<MockProvider>>) -> impl IntoResponse {
    (
        StatusCode::from_u16(mock.token_status).unwrap(),
        mock.token_body.clone(),
    )
}

async fn revoke(State(mock): State<Arc<MockProvider>>) -> impl IntoResponse {
    (StatusCode::from_u16(mock.revoke_status).unwrap(), String::new())
}

async fn current_user(State(mock): State<Arc<MockProvider>>) -> impl IntoResponse {
    Json(mock.user_body.clone())
}

async fn stats(State(mock): State<Arc<MockProvider>>) -> impl IntoResponse {
    Json(mock.stats_body.clone())
}

/// Serve the mock provider on an ephemeral port, returning its base URL
pub async fn spawn_mock_provider(mock: MockProvider) -> String {
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/oauth/revoke", post(revoke))
        .route("/api/v1/users/current", get(current_user))
        .route("/api/v1/users/current/stats/:range", get(stats))
        .with_state(Arc::new(mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Configuration pointing at nothing in particular; callback URI matches
/// what tests send to the router
pub fn test_config() -> ServerConfig {
    ServerConfig {
        oauth: OAuthCredentials {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
        },
        self_url: "http://localhost:8081".into(),
        callback_path: "/wakatime/auth".into(),
        http_port: 8081,
        database_url: "sqlite::memory:".into(),
    }
}

/// Build resources over an in-memory store and a mock provider base URL.
/// Returns the store handle too so tests can inspect persistence directly.
pub async fn test_resources(provider_base: &str) -> (Arc<ServerResources>, Arc<SqliteStore>) {
    let store = SqliteStore::new("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();
    let store = Arc::new(store);

    let config = test_config();
    let provider = WakaTimeClient::with_base_urls(
        config.oauth.clone(),
        format!("{provider_base}/oauth"),
        format!("{provider_base}/api/v1"),
    );

    let resources = Arc::new(ServerResources::new(
        Arc::clone(&store) as Arc<dyn LinkStore>,
        provider,
        config,
    ));
    (resources, store)
}

/// Resources with a default mock provider already running
pub async fn default_resources() -> (Arc<ServerResources>, Arc<SqliteStore>) {
    let base = spawn_mock_provider(MockProvider::default()).await;
    test_resources(&base).await
}

/// A committed session, directly inserted for guard and revoke tests
pub async fn seed_session(store: &SqliteStore, user_key: &str, expires_at: DateTime<Utc>) {
    store
        .upsert_session(&AuthSession {
            user_key: user_key.into(),
            external_account_id: "U1".into(),
            access_token: "tok1".into(),
            expires_at,
            profile: LinkedProfile::default(),
        })
        .await
        .unwrap();
}
