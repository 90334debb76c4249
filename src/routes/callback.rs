// ABOUTME: Browser-facing OAuth callback handler, the protocol's critical path
// ABOUTME: Rejects malformed and replayed redirects before any token exchange is attempted
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # OAuth Callback Handler
//!
//! Single-shot, stateless-per-request handler for the provider redirect.
//! Every terminal outcome is rendered as a minimal self-contained HTML
//! page: this leg is seen by the chat user's browser, not by an API
//! client. Internal error detail is logged, never shown.

use crate::errors::AuthError;
use crate::oauth::AuthorizeState;
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::response::Html;
use http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Render the minimal confirmation/error page shown to the browser
fn callback_page(message: &str) -> Html<String> {
    Html(format!(
        r"<!DOCTYPE html>
<html>
<head>
    <title>WakaTime Bridge</title>
</head>
<body>
    <h1>WakaTime Bridge</h1>
    <p>{message}</p>

    <style>
    body {{
        text-align: center;
    }}
    </style>
</body>
</html>"
    ))
}

/// Map a protocol error to the browser-facing status and message
fn error_page(err: &AuthError) -> (StatusCode, Html<String>) {
    let status = err.http_status();
    let message = match err {
        AuthError::PendingAuthorizationNotFound => "No pending authorization found".to_owned(),
        AuthError::PendingAuthorizationExpired => "Pending authorization has expired".to_owned(),
        AuthError::InvalidCorrelation => "Invalid correlation token".to_owned(),
        AuthError::ProviderRejected { description, .. } => description.clone(),
        // Never leak internal detail to the browser
        other => {
            error!("Internal error during OAuth callback: {other}");
            "Internal Server Error".to_owned()
        }
    };
    (status, callback_page(&message))
}

/// Handle `GET <callback_path>?code=..&state=..`.
///
/// Malformed input is rejected with 400 before any persistence is
/// touched; everything after parsing is delegated to the auth manager.
pub async fn handle_callback(
    State(resources): State<Arc<ServerResources>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let code = params.get("code").map(String::as_str).unwrap_or_default();
    let state = params
        .get("state")
        .and_then(|raw| AuthorizeState::from_json(raw));

    let (Some(state), false) = (state, code.is_empty()) else {
        return (StatusCode::BAD_REQUEST, callback_page("Bad Request"));
    };

    match resources.manager.complete_callback(code, &state).await {
        Ok(()) => (StatusCode::OK, callback_page("Auth succeeded")),
        Err(err) => error_page(&err),
    }
}
