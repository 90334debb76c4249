// ABOUTME: Chat command surface mapping 1:1 onto core linking operations
// ABOUTME: Returns structured replies; the host chat framework does dispatch and rendering
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Chat Commands
//!
//! `auth`, `auth.check`, `auth.revoke`, and `stats` as consumed by the
//! host chat framework. Each handler returns a structured reply value;
//! the formatters module turns replies and errors into localized text.
//! Auth-state errors are recovered by the caller, never crash dispatch.

use crate::chart::{PieChart, PieSection};
use crate::errors::AuthResult;
use crate::provider::{StatsData, StatsRange};
use crate::resources::ServerResources;
use chrono::{DateTime, Utc};

/// Structured outcome of a chat command, rendered by the formatters layer
#[derive(Debug, Clone)]
pub enum CommandReply {
    /// `auth`: the user should visit this authorize URL
    AuthorizeUrl {
        /// Browser-facing authorize URL with the embedded state parameter
        url: String,
    },
    /// `auth.check`: the link is valid
    AuthStatus {
        /// Linked WakaTime username, when known
        username: Option<String>,
        /// When the authorization expires
        expires_at: DateTime<Utc>,
    },
    /// `auth.revoke`: local session deleted and provider notified
    Revoked,
    /// `stats`: aggregate statistics, optionally shaped for a pie chart
    Stats {
        /// Typed subset of the provider's stats payload
        data: Box<StatsData>,
        /// Pie-chart definition when a chart section was requested
        chart: Option<PieChart>,
    },
}

/// `auth` — begin or resume the linking handshake.
///
/// # Errors
///
/// `Database` when the store fails, `Internal` when the authorize URL
/// cannot be constructed.
pub async fn auth(resources: &ServerResources, user_key: &str) -> AuthResult<CommandReply> {
    let url = resources.manager.initiate(user_key).await?;
    Ok(CommandReply::AuthorizeUrl { url })
}

/// `auth.check` — report the linked account and session expiry. Refreshes
/// the cached profile as a side effect.
///
/// # Errors
///
/// Session-guard errors when unauthenticated, `Network` when the profile
/// fetch fails.
pub async fn auth_check(resources: &ServerResources, user_key: &str) -> AuthResult<CommandReply> {
    let session = resources.manager.require_session(user_key).await?;
    let profile = resources.manager.refresh_profile(&session).await?;
    Ok(CommandReply::AuthStatus {
        username: profile.username,
        expires_at: session.expires_at,
    })
}

/// `auth.revoke` — delete the local session and notify the provider.
///
/// # Errors
///
/// Session-guard errors when unauthenticated, `Network` when the provider
/// call fails (the local deletion has already completed).
pub async fn auth_revoke(resources: &ServerResources, user_key: &str) -> AuthResult<CommandReply> {
    resources.manager.revoke(user_key).await?;
    Ok(CommandReply::Revoked)
}

/// `stats [--range R] [--graph [SECTION]]` — pass-through statistics
/// query. `--graph` without a section charts languages
/// ([`PieSection::default`]); any of the four section keys can be named
/// explicitly.
///
/// # Errors
///
/// Session-guard errors when unauthenticated, `Network` when the stats
/// fetch fails.
pub async fn stats(
    resources: &ServerResources,
    user_key: &str,
    range: StatsRange,
    graph: Option<PieSection>,
) -> AuthResult<CommandReply> {
    let session = resources.manager.require_session(user_key).await?;
    let data = resources
        .manager
        .provider()
        .stats(&session.access_token, range)
        .await?;

    let chart = graph.map(|section| PieChart::from_stats(&data, section));

    Ok(CommandReply::Stats {
        data: Box::new(data),
        chart,
    })
}
