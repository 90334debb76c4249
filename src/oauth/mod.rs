// ABOUTME: OAuth module organizing the authorization-linking protocol
// ABOUTME: Wire types for the state parameter plus the manager driving the handshake
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # OAuth Linking Protocol
//!
//! The state parameter round-trips through the provider as URL-encoded
//! JSON. Field names on the wire (`actionId`, `kid`) are kept from the
//! original deployment so pending handshakes survive an upgrade.

pub mod manager;

pub use manager::AuthManager;

use serde::{Deserialize, Serialize};

/// Contents of the anti-CSRF `state` parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeState {
    /// Correlation token binding this authorize request to its callback
    #[serde(rename = "actionId")]
    pub correlation_token: String,
    /// Chat-layer user identifier
    #[serde(rename = "kid")]
    pub user_key: String,
}

impl AuthorizeState {
    /// Serialize for embedding in the authorize URL
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serialization of two plain strings cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse the callback's `state` query parameter
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
