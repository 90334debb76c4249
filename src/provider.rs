// ABOUTME: WakaTime HTTP client covering the OAuth endpoints and the read-only stats API
// ABOUTME: Token exchange parses the provider's form-encoded payload and surfaces OAuth error objects
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # WakaTime Provider Client
//!
//! Outbound calls to the WakaTime OAuth and REST endpoints. Base URLs are
//! constructor inputs so tests can point the client at a local mock. Every
//! failure is terminal; no retries are attempted anywhere.

use crate::config::environment::OAuthCredentials;
use crate::errors::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::error;

/// Production OAuth endpoint base
pub const DEFAULT_OAUTH_BASE: &str = "https://wakatime.com/oauth";

/// Production REST API base
pub const DEFAULT_API_BASE: &str = "https://wakatime.com/api/v1";

/// Minimum scope needed for read-only statistics
pub const OAUTH_SCOPE: &str = "read_summaries,read_stats";

/// Statistics aggregation ranges supported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsRange {
    /// Trailing seven days (provider default)
    #[default]
    Last7Days,
    /// Trailing thirty days
    Last30Days,
    /// Trailing six months
    Last6Months,
    /// Trailing year
    LastYear,
    /// Entire account history
    AllTime,
}

impl StatsRange {
    /// Path segment used by the stats endpoint
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days",
            Self::Last6Months => "last_6_months",
            Self::LastYear => "last_year",
            Self::AllTime => "all_time",
        }
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_7_days" => Ok(Self::Last7Days),
            "last_30_days" => Ok(Self::Last30Days),
            "last_6_months" => Ok(Self::Last6Months),
            "last_year" => Ok(Self::LastYear),
            "all_time" => Ok(Self::AllTime),
            other => Err(format!("unknown stats range: {other}")),
        }
    }
}

/// Successful token exchange result
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Bearer credential for API calls
    pub access_token: String,
    /// Provider account ID
    pub uid: String,
    /// Token expiry reported by the provider
    pub expires_at: DateTime<Utc>,
}

/// Raw form-encoded token endpoint payload; success and error fields share
/// one shape because the provider returns either set in the same encoding.
#[derive(Debug, Deserialize)]
struct RawTokenPayload {
    access_token: Option<String>,
    uid: Option<String>,
    expires_at: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// One aggregate entry in a stats section (language, editor, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct StatItem {
    /// Entry name (e.g. "Rust")
    pub name: String,
    /// Share of total time, 0-100
    #[serde(default)]
    pub percent: f64,
    /// Human-readable duration (e.g. "4 hrs 12 mins")
    #[serde(default)]
    pub text: String,
    /// Total seconds spent
    #[serde(default)]
    pub total_seconds: f64,
}

/// Aggregate statistics for one range, a typed subset of the provider's
/// response limited to what the chat commands consume
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsData {
    /// Total including unrecognized languages, human readable
    #[serde(default)]
    pub human_readable_total_including_other_language: Option<String>,
    /// Daily average including unrecognized languages, human readable
    #[serde(default)]
    pub human_readable_daily_average_including_other_language: Option<String>,
    /// Range label (e.g. "Last 7 Days")
    #[serde(default)]
    pub human_readable_range: Option<String>,
    /// Account username, null for private accounts
    #[serde(default)]
    pub username: Option<String>,
    /// Per-language aggregates
    #[serde(default)]
    pub languages: Vec<StatItem>,
    /// Per-editor aggregates
    #[serde(default)]
    pub editors: Vec<StatItem>,
    /// Per-machine aggregates
    #[serde(default)]
    pub machines: Vec<StatItem>,
    /// Per-OS aggregates
    #[serde(default)]
    pub operating_systems: Vec<StatItem>,
}

/// Profile attributes from the current-user endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    /// Account ID
    pub id: String,
    /// Account username, null for accounts without one
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client for the WakaTime provider
#[derive(Clone)]
pub struct WakaTimeClient {
    http: reqwest::Client,
    credentials: OAuthCredentials,
    oauth_base: String,
    api_base: String,
}

impl WakaTimeClient {
    /// Client against the production WakaTime endpoints
    #[must_use]
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self::with_base_urls(credentials, DEFAULT_OAUTH_BASE, DEFAULT_API_BASE)
    }

    /// Client against explicit endpoint bases (used by tests)
    #[must_use]
    pub fn with_base_urls(
        credentials: OAuthCredentials,
        oauth_base: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            oauth_base: oauth_base.into(),
            api_base: api_base.into(),
        }
    }

    /// Build the browser-facing authorize URL. No network call is made;
    /// the redirect is performed by the chat user's browser.
    ///
    /// # Errors
    ///
    /// `Internal` when the configured OAuth base is not a valid URL.
    pub fn authorize_url(&self, redirect_uri: &str, state_json: &str) -> AuthResult<String> {
        let mut url = url::Url::parse(&format!("{}/authorize", self.oauth_base))
            .map_err(|e| AuthError::Internal(format!("invalid OAuth base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state_json)
            .append_pair("scope", OAUTH_SCOPE);
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The provider answers with a form-encoded body on both success and
    /// failure, so the HTTP status is never treated as the verdict; the
    /// body is inspected for an OAuth error object instead.
    ///
    /// # Errors
    ///
    /// `ProviderRejected` when the provider returns an error payload,
    /// `Network` on transport failure or an unparseable body.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AuthResult<TokenGrant> {
        const ACTION: &str = "exchanging authorization code";

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
            ("code", code),
        ];

        let response = self
            .http
            .post(format!("{}/token", self.oauth_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::network(ACTION, &e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::network(ACTION, &e))?;

        let payload: RawTokenPayload = serde_urlencoded::from_str(&body)
            .map_err(|_| AuthError::network_body(ACTION, status, &body))?;

        if let Some(oauth_error) = payload.error {
            let description = payload.error_description.unwrap_or_else(|| oauth_error.clone());
            error!("Token exchange rejected by provider: {oauth_error} ({description})");
            return Err(AuthError::ProviderRejected {
                error: oauth_error,
                description,
            });
        }

        let (Some(access_token), Some(uid)) = (payload.access_token, payload.uid) else {
            return Err(AuthError::network_body(ACTION, status, &body));
        };

        let expires_at = parse_expiry(payload.expires_at.as_deref(), payload.expires_in)
            .ok_or_else(|| AuthError::network_body(ACTION, status, "token payload carries no expiry"))?;

        Ok(TokenGrant {
            access_token,
            uid,
            expires_at,
        })
    }

    /// Revoke an access token with the provider.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure or a non-success status.
    pub async fn revoke_token(&self, access_token: &str) -> AuthResult<()> {
        const ACTION: &str = "revoking authorization";

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("token", access_token),
        ];

        let response = self
            .http
            .post(format!("{}/revoke", self.oauth_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::network(ACTION, &e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::network_body(ACTION, status, &body));
        }

        Ok(())
    }

    /// Fetch the current user's profile attributes.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure or a non-success status.
    pub async fn current_user(&self, access_token: &str) -> AuthResult<UserData> {
        const ACTION: &str = "fetching user data";

        let envelope: Envelope<UserData> = self
            .get_json(&format!("{}/users/current", self.api_base), access_token, ACTION)
            .await?;
        Ok(envelope.data)
    }

    /// Fetch aggregate statistics for a range.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure or a non-success status.
    pub async fn stats(&self, access_token: &str, range: StatsRange) -> AuthResult<StatsData> {
        const ACTION: &str = "getting stats";

        let envelope: Envelope<StatsData> = self
            .get_json(
                &format!("{}/users/current/stats/{}", self.api_base, range),
                access_token,
                ACTION,
            )
            .await?;
        Ok(envelope.data)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        action: &str,
    ) -> AuthResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::network(action, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::network_body(action, status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::network(action, &e))
    }
}

/// Provider expiry: an RFC3339 `expires_at`, with `expires_in` seconds as
/// the fallback when only the relative form is present
fn parse_expiry(expires_at: Option<&str>, expires_in: Option<i64>) -> Option<DateTime<Utc>> {
    if let Some(raw) = expires_at {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    expires_in.map(|secs| Utc::now() + Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_range_round_trips() {
        for range in [
            StatsRange::Last7Days,
            StatsRange::Last30Days,
            StatsRange::Last6Months,
            StatsRange::LastYear,
            StatsRange::AllTime,
        ] {
            assert_eq!(range.as_str().parse::<StatsRange>().unwrap(), range);
        }
        assert!("next_week".parse::<StatsRange>().is_err());
        assert_eq!(StatsRange::default(), StatsRange::Last7Days);
    }

    #[test]
    fn authorize_url_embeds_state_and_scope() {
        let client = WakaTimeClient::new(OAuthCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
        });
        let url = client
            .authorize_url("https://bridge.example.com/wakatime/auth", "{\"kid\":\"a\"}")
            .unwrap();
        assert!(url.starts_with("https://wakatime.com/oauth/authorize?"));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=read_summaries%2Cread_stats"));
        assert!(url.contains("state=%7B%22kid%22%3A%22a%22%7D"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn expiry_prefers_absolute_timestamp() {
        let parsed = parse_expiry(Some("2030-01-01T00:00:00Z"), Some(60)).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-01-01T00:00:00+00:00");
    }

    #[test]
    fn expiry_falls_back_to_relative_seconds() {
        let parsed = parse_expiry(None, Some(3600)).unwrap();
        let delta = parsed - Utc::now();
        assert!(delta > Duration::minutes(59));
        assert!(delta <= Duration::hours(1));
        assert!(parse_expiry(None, None).is_none());
    }

    #[test]
    fn token_payload_parses_form_encoding() {
        let raw = "access_token=tok1&refresh_token=ref1&uid=U1&token_type=bearer&expires_at=2030-01-01T00%3A00%3A00Z&expires_in=3600&scope=read_stats";
        let payload: RawTokenPayload = serde_urlencoded::from_str(raw).unwrap();
        assert_eq!(payload.access_token.as_deref(), Some("tok1"));
        assert_eq!(payload.uid.as_deref(), Some("U1"));
        assert_eq!(payload.expires_in, Some(3600));
        assert!(payload.error.is_none());
    }

    #[test]
    fn token_payload_parses_error_object() {
        let raw = "error=invalid_grant&error_description=Code%20expired";
        let payload: RawTokenPayload = serde_urlencoded::from_str(raw).unwrap();
        assert_eq!(payload.error.as_deref(), Some("invalid_grant"));
        assert_eq!(payload.error_description.as_deref(), Some("Code expired"));
    }
}
