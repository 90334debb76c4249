// ABOUTME: SQLite implementation of the LinkStore trait via sqlx
// ABOUTME: Inline schema migration plus keyed CRUD for both protocol tables
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! SQLite-backed store for pending authorizations and sessions

use super::LinkStore;
use crate::models::{AuthSession, LinkedProfile, PendingAuthorization};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

/// SQLite database for link records
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and create if missing) the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the pool cannot connect.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory SQLite database exists per connection; a second
        // pooled connection would see an empty schema.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Create both protocol tables.
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS pending_authorizations (
                user_key TEXT PRIMARY KEY,
                correlation_token TEXT NOT NULL,
                expires_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS auth_sessions (
                user_key TEXT PRIMARY KEY,
                external_account_id TEXT NOT NULL,
                access_token TEXT NOT NULL,
                expires_at DATETIME NOT NULL,
                username TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LinkStore for SqliteStore {
    async fn get_pending_auth(&self, user_key: &str) -> Result<Option<PendingAuthorization>> {
        let row = sqlx::query(
            "SELECT user_key, correlation_token, expires_at FROM pending_authorizations WHERE user_key = ?",
        )
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| PendingAuthorization {
            user_key: row.get("user_key"),
            correlation_token: row.get("correlation_token"),
            expires_at: row.get::<DateTime<Utc>, _>("expires_at"),
        }))
    }

    async fn upsert_pending_auth(&self, pending: &PendingAuthorization) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO pending_authorizations (user_key, correlation_token, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_key) DO UPDATE SET
                correlation_token = excluded.correlation_token,
                expires_at = excluded.expires_at
            ",
        )
        .bind(&pending.user_key)
        .bind(&pending.correlation_token)
        .bind(pending.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_pending_auth(&self, user_key: &str) -> Result<()> {
        sqlx::query("DELETE FROM pending_authorizations WHERE user_key = ?")
            .bind(user_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_session(&self, user_key: &str) -> Result<Option<AuthSession>> {
        let row = sqlx::query(
            r"
            SELECT user_key, external_account_id, access_token, expires_at, username
            FROM auth_sessions WHERE user_key = ?
            ",
        )
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| AuthSession {
            user_key: row.get("user_key"),
            external_account_id: row.get("external_account_id"),
            access_token: row.get("access_token"),
            expires_at: row.get::<DateTime<Utc>, _>("expires_at"),
            profile: LinkedProfile {
                username: row.get("username"),
            },
        }))
    }

    async fn upsert_session(&self, session: &AuthSession) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO auth_sessions (user_key, external_account_id, access_token, expires_at, username)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_key) DO UPDATE SET
                external_account_id = excluded.external_account_id,
                access_token = excluded.access_token,
                expires_at = excluded.expires_at,
                username = excluded.username
            ",
        )
        .bind(&session.user_key)
        .bind(&session.external_account_id)
        .bind(&session.access_token)
        .bind(session.expires_at)
        .bind(&session.profile.username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_session_profile(&self, user_key: &str, profile: &LinkedProfile) -> Result<()> {
        sqlx::query("UPDATE auth_sessions SET username = ? WHERE user_key = ?")
            .bind(&profile.username)
            .bind(user_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_session(&self, user_key: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE user_key = ?")
            .bind(user_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
