// ABOUTME: Unified error types for the authorization-linking protocol
// ABOUTME: Maps every terminal error kind to the HTTP status used by the callback leg
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Error Handling
//!
//! Tagged error kinds for everything the linking protocol can reject.
//! Authentication-state errors are recovered at the command layer into
//! localized messages; callback-path errors are recovered at the handler
//! boundary into an HTTP status plus HTML body. Nothing here retries.

use http::StatusCode;
use thiserror::Error;

/// Result alias used throughout the auth flow
pub type AuthResult<T> = Result<T, AuthError>;

/// Every terminal failure of the linking protocol
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session exists for the user
    #[error("user has not authorized a WakaTime account")]
    NotAuthorized,

    /// A session exists but its token expiry has passed
    #[error("WakaTime authorization has expired")]
    AuthorizationExpired,

    /// Callback state token does not match the stored pending record
    #[error("correlation token does not match the pending authorization")]
    InvalidCorrelation,

    /// Callback arrived with no pending authorization on record
    #[error("no pending authorization found")]
    PendingAuthorizationNotFound,

    /// Pending authorization outlived its 5-minute window
    #[error("pending authorization has expired")]
    PendingAuthorizationExpired,

    /// Provider returned an OAuth error object instead of a token grant
    #[error("provider rejected the request: {description}")]
    ProviderRejected {
        /// Machine-readable OAuth error code (e.g. `invalid_grant`)
        error: String,
        /// Human-readable description from the provider
        description: String,
    },

    /// Transport or HTTP failure talking to the provider
    #[error("network error while {action}: {message}")]
    Network {
        /// Human-readable description of the action being performed
        action: String,
        /// HTTP status, when the failure happened above the transport
        status: Option<u16>,
        /// Transport error or response body excerpt
        message: String,
    },

    /// Persistence layer failure
    #[error("database error: {0}")]
    Database(String),

    /// Anything unexpected; details are logged, never shown to browsers
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status for the browser-facing callback leg
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidCorrelation | Self::ProviderRejected { .. } => StatusCode::BAD_REQUEST,
            Self::PendingAuthorizationNotFound => StatusCode::NOT_FOUND,
            Self::PendingAuthorizationExpired => StatusCode::GONE,
            Self::NotAuthorized | Self::AuthorizationExpired => StatusCode::UNAUTHORIZED,
            Self::Network { .. } | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Build a `Network` error from a reqwest transport failure
    pub fn network(action: impl Into<String>, err: &reqwest::Error) -> Self {
        Self::Network {
            action: action.into(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Build a `Network` error from an unexpected provider response body
    pub fn network_body(action: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Network {
            action: action.into(),
            status: Some(status),
            message: body.chars().take(256).collect(),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}
