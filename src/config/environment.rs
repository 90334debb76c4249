// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads OAuth credentials, public base URL, callback path, and runtime settings
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Default path the provider redirects back to after authorization
pub const DEFAULT_CALLBACK_PATH: &str = "/wakatime/auth";

/// Default HTTP port for the callback server
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:wakatime_bridge.db";

/// OAuth application credentials for the WakaTime provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthCredentials {
    /// OAuth client ID issued by WakaTime
    pub client_id: String,
    /// OAuth client secret issued by WakaTime
    pub client_secret: String,
}

/// Complete server configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// OAuth application credentials
    pub oauth: OAuthCredentials,
    /// Externally reachable base URL of this host (no trailing slash)
    pub self_url: String,
    /// Path the OAuth callback is served at
    pub callback_path: String,
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// Database connection string
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `WAKATIME_CLIENT_ID`, `WAKATIME_CLIENT_SECRET`,
    /// or `BRIDGE_SELF_URL` are missing, or if `HTTP_PORT` is not a valid
    /// port number.
    pub fn from_env() -> Result<Self> {
        let client_id =
            env::var("WAKATIME_CLIENT_ID").context("WAKATIME_CLIENT_ID must be set")?;
        let client_secret =
            env::var("WAKATIME_CLIENT_SECRET").context("WAKATIME_CLIENT_SECRET must be set")?;
        let self_url = env::var("BRIDGE_SELF_URL")
            .context("BRIDGE_SELF_URL must be set to the externally reachable base URL")?;

        let callback_path =
            env::var("BRIDGE_CALLBACK_PATH").unwrap_or_else(|_| DEFAULT_CALLBACK_PATH.to_owned());

        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port.parse().context("HTTP_PORT must be a valid port")?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let config = Self {
            oauth: OAuthCredentials {
                client_id,
                client_secret,
            },
            self_url: self_url.trim_end_matches('/').to_owned(),
            callback_path,
            http_port,
            database_url,
        };
        config.validate_and_log();
        Ok(config)
    }

    /// Full redirect URI registered with the provider
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.self_url, self.callback_path)
    }

    /// One-line summary for startup logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "client_id={} callback={} port={} database={}",
            self.oauth.client_id,
            self.redirect_uri(),
            self.http_port,
            self.database_url
        )
    }

    fn validate_and_log(&self) {
        if !self.callback_path.starts_with('/') {
            warn!(
                "Callback path {} does not start with '/'; the provider redirect will not match",
                self.callback_path
            );
        }
        if self.self_url.starts_with("http://") && !self.self_url.contains("localhost") {
            warn!("BRIDGE_SELF_URL is plain HTTP on a non-local host; tokens will transit unencrypted");
        }
    }
}
