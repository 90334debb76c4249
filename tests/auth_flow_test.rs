// ABOUTME: Integration tests for authorization initiation
// ABOUTME: Covers idempotent reuse, expiry rotation, and authorize-URL construction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use wakatime_bridge::database::LinkStore;
use wakatime_bridge::models::PendingAuthorization;
use wakatime_bridge::oauth::AuthorizeState;

/// Pull the state parameter back out of an authorize URL
fn state_from_url(url: &str) -> AuthorizeState {
    let raw = url
        .split('&')
        .find_map(|pair| pair.strip_prefix("state="))
        .expect("authorize URL carries a state parameter");
    let decoded = urlencoding::decode(raw).unwrap();
    AuthorizeState::from_json(&decoded).expect("state parameter is valid JSON")
}

#[tokio::test]
async fn initiate_is_idempotent_within_ttl() {
    let (resources, store) = common::default_resources().await;

    let first = resources.manager.initiate("user-a").await.unwrap();
    let second = resources.manager.initiate("user-a").await.unwrap();
    assert_eq!(first, second);

    let pending = store.get_pending_auth("user-a").await.unwrap().unwrap();
    assert_eq!(
        state_from_url(&first).correlation_token,
        pending.correlation_token
    );
}

#[tokio::test]
async fn expired_pending_is_replaced_with_fresh_token() {
    let (resources, store) = common::default_resources().await;

    let stale = PendingAuthorization {
        user_key: "user-a".into(),
        correlation_token: "stale-token".into(),
        expires_at: Utc::now() - Duration::seconds(1),
    };
    store.upsert_pending_auth(&stale).await.unwrap();

    let url = resources.manager.initiate("user-a").await.unwrap();
    let state = state_from_url(&url);
    assert_ne!(state.correlation_token, "stale-token");

    let pending = store.get_pending_auth("user-a").await.unwrap().unwrap();
    assert_eq!(pending.correlation_token, state.correlation_token);
    assert!(!pending.is_expired());
}

#[tokio::test]
async fn authorize_url_embeds_user_and_redirect() {
    let (resources, _store) = common::default_resources().await;

    let url = resources.manager.initiate("user-a").await.unwrap();
    let state = state_from_url(&url);
    assert_eq!(state.user_key, "user-a");
    assert!(url.contains("client_id=test-client"));
    assert!(url.contains(&urlencoding::encode("http://localhost:8081/wakatime/auth").into_owned()));
}

#[tokio::test]
async fn users_get_independent_pending_records() {
    let (resources, store) = common::default_resources().await;

    let url_a = resources.manager.initiate("user-a").await.unwrap();
    let url_b = resources.manager.initiate("user-b").await.unwrap();
    assert_ne!(
        state_from_url(&url_a).correlation_token,
        state_from_url(&url_b).correlation_token
    );
    assert!(store.get_pending_auth("user-a").await.unwrap().is_some());
    assert!(store.get_pending_auth("user-b").await.unwrap().is_some());
}
