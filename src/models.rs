// ABOUTME: Core data records for the linking protocol
// ABOUTME: Pending authorizations, committed sessions, and cached profile attributes
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data model for the authorization-linking protocol.
//!
//! Both record types are exclusively owned by the persistence layer; every
//! authorization check is a fresh read, so the stored row is the single
//! source of truth across process restarts.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed lifetime of a pending authorization
pub const PENDING_AUTH_TTL_MINUTES: i64 = 5;

/// Length of the random correlation token
const CORRELATION_TOKEN_LEN: usize = 32;

/// An in-flight OAuth handshake, at most one per user.
///
/// Created on the first `auth` command, consumed by the callback, and
/// deleted lazily whenever read past its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    /// Chat-layer identifier of the requesting user (primary key)
    pub user_key: String,
    /// Opaque random value binding the authorize request to its callback
    pub correlation_token: String,
    /// Absolute expiry, 5 minutes from creation
    pub expires_at: DateTime<Utc>,
}

impl PendingAuthorization {
    /// Create a fresh pending authorization with a new correlation token
    #[must_use]
    pub fn new(user_key: &str) -> Self {
        Self {
            user_key: user_key.to_owned(),
            correlation_token: generate_correlation_token(),
            expires_at: Utc::now() + Duration::minutes(PENDING_AUTH_TTL_MINUTES),
        }
    }

    /// Whether the record's expiry has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Display attributes cached from the provider's current-user endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedProfile {
    /// WakaTime username
    pub username: Option<String>,
}

/// A completed, currently valid link between a chat user and a WakaTime
/// account. Presence of a non-expired session is the sole authorization
/// predicate for every authenticated command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Chat-layer identifier of the linked user (primary key)
    pub user_key: String,
    /// Opaque account ID returned by the provider (`uid`)
    pub external_account_id: String,
    /// Bearer credential for subsequent API calls
    pub access_token: String,
    /// Token expiry as reported by the provider
    pub expires_at: DateTime<Utc>,
    /// Cached display attributes, refreshed opportunistically
    pub profile: LinkedProfile,
}

impl AuthSession {
    /// Whether the provider-supplied token expiry has passed
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Generate an unguessable alphanumeric correlation token
#[must_use]
pub fn generate_correlation_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CORRELATION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
