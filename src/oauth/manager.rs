// ABOUTME: Central manager for the authorization-linking handshake
// ABOUTME: Implements initiation, callback completion, session guard, revocation, and profile refresh
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Auth Manager
//!
//! Drives the complete linking flow: pending-authorization creation, the
//! callback's correlate/exchange/commit sequence, session validation with
//! lazy expiry, and best-effort revocation. All cross-request state lives
//! in the store; every check is a fresh read.

use super::AuthorizeState;
use crate::config::ServerConfig;
use crate::database::LinkStore;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthSession, LinkedProfile, PendingAuthorization};
use crate::provider::WakaTimeClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Central manager for the linking protocol
pub struct AuthManager {
    store: Arc<dyn LinkStore>,
    provider: WakaTimeClient,
    config: ServerConfig,
}

impl AuthManager {
    /// Create a manager over explicit store, provider, and config handles
    #[must_use]
    pub fn new(store: Arc<dyn LinkStore>, provider: WakaTimeClient, config: ServerConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// The provider client, for pass-through calls (stats)
    #[must_use]
    pub const fn provider(&self) -> &WakaTimeClient {
        &self.provider
    }

    /// Begin (or resume) an authorization handshake for a user.
    ///
    /// An unexpired pending record is reused so a repeated `auth` command
    /// returns the same correlation token and a stale browser tab stays
    /// valid. Expired records are replaced. No network call happens here;
    /// the redirect is performed by the user's browser.
    ///
    /// # Errors
    ///
    /// `Database` when the store fails, `Internal` when the authorize URL
    /// cannot be constructed.
    pub async fn initiate(&self, user_key: &str) -> AuthResult<String> {
        let pending = match self.store.get_pending_auth(user_key).await? {
            Some(existing) if !existing.is_expired() => existing,
            stale => {
                if stale.is_some() {
                    self.store.delete_pending_auth(user_key).await?;
                }
                let fresh = PendingAuthorization::new(user_key);
                self.store.upsert_pending_auth(&fresh).await?;
                fresh
            }
        };

        let state = AuthorizeState {
            correlation_token: pending.correlation_token,
            user_key: user_key.to_owned(),
        };

        self.provider
            .authorize_url(&self.config.redirect_uri(), &state.to_json())
    }

    /// Complete the handshake from the provider's redirect.
    ///
    /// Correlates the state parameter against the stored pending record,
    /// exchanges the authorization code, and commits the session. The
    /// pending record is consumed on success and on expiry; a correlation
    /// mismatch leaves it untouched, and a provider rejection leaves it
    /// valid for a retry with a fresh code inside its window.
    ///
    /// # Errors
    ///
    /// Every terminal outcome of the callback state machine (§ callback
    /// status table in `AuthError::http_status`).
    pub async fn complete_callback(&self, code: &str, state: &AuthorizeState) -> AuthResult<()> {
        let user_key = state.user_key.as_str();

        let pending = self
            .store
            .get_pending_auth(user_key)
            .await?
            .ok_or(AuthError::PendingAuthorizationNotFound)?;

        if pending.correlation_token != state.correlation_token {
            // Possible CSRF or replay; the record is not consumed so the
            // legitimate tab can still complete.
            return Err(AuthError::InvalidCorrelation);
        }

        if pending.is_expired() {
            self.store.delete_pending_auth(user_key).await?;
            return Err(AuthError::PendingAuthorizationExpired);
        }

        let grant = self
            .provider
            .exchange_code(code, &self.config.redirect_uri())
            .await?;

        let session = AuthSession {
            user_key: user_key.to_owned(),
            external_account_id: grant.uid,
            access_token: grant.access_token,
            expires_at: grant.expires_at,
            profile: LinkedProfile::default(),
        };

        // Commit: two independent single-key writes, not a transaction. A
        // crash in between leaves a pending record that self-heals via its
        // own expiry.
        let (deleted, upserted) = tokio::join!(
            self.store.delete_pending_auth(user_key),
            self.store.upsert_session(&session),
        );
        deleted?;
        upserted?;

        info!("Authorization committed for user {user_key}");
        self.spawn_profile_refresh(session);
        Ok(())
    }

    /// Resolve and validate the session for any authenticated operation.
    ///
    /// Expired sessions are purged on read; there is no background sweep.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` when no session exists, `AuthorizationExpired` when
    /// the stored expiry has passed.
    pub async fn require_session(&self, user_key: &str) -> AuthResult<AuthSession> {
        let session = self
            .store
            .get_session(user_key)
            .await?
            .ok_or(AuthError::NotAuthorized)?;

        if session.is_expired() {
            self.store.delete_session(user_key).await?;
            return Err(AuthError::AuthorizationExpired);
        }

        Ok(session)
    }

    /// Revoke a user's authorization.
    ///
    /// The local delete and the provider revoke run concurrently. Local
    /// state is authoritative: a provider-side failure surfaces to the
    /// caller but never rolls back the local deletion. A callback racing
    /// this call resolves last-write-wins.
    ///
    /// # Errors
    ///
    /// Session-guard errors when unauthenticated, `Network` when the
    /// provider call fails after the local delete completed.
    pub async fn revoke(&self, user_key: &str) -> AuthResult<()> {
        let session = self.require_session(user_key).await?;

        let (local, remote) = tokio::join!(
            self.store.delete_session(user_key),
            self.provider.revoke_token(&session.access_token),
        );
        local?;

        if let Err(err) = remote {
            warn!("Provider revoke failed for user {user_key}: {err}");
            return Err(err);
        }

        info!("Authorization revoked for user {user_key}");
        Ok(())
    }

    /// Fetch the linked profile from the provider and persist it onto the
    /// session record without touching token or expiry fields.
    ///
    /// # Errors
    ///
    /// `Network` tagged with the fetching action, `Database` when the
    /// partial update fails.
    pub async fn refresh_profile(&self, session: &AuthSession) -> AuthResult<LinkedProfile> {
        let user = self.provider.current_user(&session.access_token).await?;
        let profile = LinkedProfile {
            username: user.username,
        };
        self.store
            .update_session_profile(&session.user_key, &profile)
            .await?;
        Ok(profile)
    }

    /// Fire-and-forget profile refresh after a successful token exchange.
    /// Failure is logged and never propagates to the callback response.
    fn spawn_profile_refresh(&self, session: AuthSession) {
        let store = Arc::clone(&self.store);
        let provider = self.provider.clone();
        tokio::spawn(async move {
            match provider.current_user(&session.access_token).await {
                Ok(user) => {
                    let profile = LinkedProfile {
                        username: user.username,
                    };
                    if let Err(err) = store
                        .update_session_profile(&session.user_key, &profile)
                        .await
                    {
                        warn!(
                            "Profile refresh write failed for user {}: {err}",
                            session.user_key
                        );
                    }
                }
                Err(err) => warn!(
                    "Profile refresh fetch failed for user {}: {err}",
                    session.user_key
                ),
            }
        });
    }
}
