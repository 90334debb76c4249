// ABOUTME: Integration tests for authorization revocation
// ABOUTME: Local deletion is authoritative; provider failures surface without rolling back
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::MockProvider;
use wakatime_bridge::database::LinkStore;
use wakatime_bridge::errors::AuthError;

#[tokio::test]
async fn revoke_deletes_local_session_and_notifies_provider() {
    let (resources, store) = common::default_resources().await;
    common::seed_session(&store, "user-a", Utc::now() + Duration::hours(1)).await;

    resources.manager.revoke("user-a").await.unwrap();
    assert!(store.get_session("user-a").await.unwrap().is_none());
}

#[tokio::test]
async fn provider_failure_surfaces_but_local_deletion_stands() {
    let base = common::spawn_mock_provider(MockProvider {
        revoke_status: 500,
        ..MockProvider::default()
    })
    .await;
    let (resources, store) = common::test_resources(&base).await;
    common::seed_session(&store, "user-a", Utc::now() + Duration::hours(1)).await;

    let err = resources.manager.revoke("user-a").await.unwrap_err();
    match err {
        AuthError::Network { action, status, .. } => {
            assert_eq!(action, "revoking authorization");
            assert_eq!(status, Some(500));
        }
        other => panic!("expected Network error, got {other:?}"),
    }

    // Local state is authoritative: the session is gone regardless.
    assert!(store.get_session("user-a").await.unwrap().is_none());
}

#[tokio::test]
async fn revoke_without_session_fails_like_any_authenticated_command() {
    let (resources, _store) = common::default_resources().await;
    let err = resources.manager.revoke("user-a").await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthorized));
}
