// ABOUTME: HTTP router for the browser-facing callback leg
// ABOUTME: Wires the OAuth callback path and a health probe onto shared server resources
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP routes for the OAuth callback and health checking

pub mod callback;

use crate::resources::ServerResources;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router. The callback path comes from
/// configuration because it must match the redirect URI registered with
/// the provider.
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route(&resources.config.callback_path, get(callback::handle_callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(resources)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "wakatime-bridge" }))
}
