// ABOUTME: Persistence abstraction for pending authorizations and sessions
// ABOUTME: Keyed CRUD trait implemented by the SQLite backend
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Persistence Layer
//!
//! Both protocol records live exclusively in the store; callers perform
//! every expiry check on a fresh read. The store itself is a dumb keyed
//! CRUD layer — lazy-expiry deletes are the caller's job, which keeps
//! single-key reads and writes atomic without explicit locking.

use crate::models::{AuthSession, LinkedProfile, PendingAuthorization};
use anyhow::Result;
use async_trait::async_trait;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Storage interface for the two protocol record types.
///
/// One pending authorization and one session per `user_key`; upserts
/// overwrite.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Fetch the pending authorization for a user, if any
    async fn get_pending_auth(&self, user_key: &str) -> Result<Option<PendingAuthorization>>;

    /// Create or overwrite the pending authorization for a user
    async fn upsert_pending_auth(&self, pending: &PendingAuthorization) -> Result<()>;

    /// Delete the pending authorization for a user (no-op when absent)
    async fn delete_pending_auth(&self, user_key: &str) -> Result<()>;

    /// Fetch the committed session for a user, if any
    async fn get_session(&self, user_key: &str) -> Result<Option<AuthSession>>;

    /// Create or overwrite the session for a user
    async fn upsert_session(&self, session: &AuthSession) -> Result<()>;

    /// Partially update the cached profile without touching token fields
    async fn update_session_profile(&self, user_key: &str, profile: &LinkedProfile) -> Result<()>;

    /// Delete the session for a user (no-op when absent)
    async fn delete_session(&self, user_key: &str) -> Result<()>;
}
