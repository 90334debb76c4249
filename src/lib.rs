// ABOUTME: Library entry point for the WakaTime chat bridge
// ABOUTME: OAuth2 account linking, session management, and read-only stats pass-through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Async-IO.org

#![deny(unsafe_code)]

//! # WakaTime Bridge
//!
//! A chat-bot integration that links a chat user's identity to a WakaTime
//! account via OAuth2 and proxies read-only statistics back into chat
//! replies.
//!
//! The heart of the crate is the authorization-linking protocol: a
//! short-lived pending-authorization handshake tying together a
//! user-initiated authorize request, a CSRF-resistant correlation token,
//! the external redirect/callback leg, and token exchange with persistent
//! session creation.
//!
//! ## Architecture
//!
//! - **models / database**: the two protocol records and their SQLite store
//! - **oauth**: wire types and the [`oauth::AuthManager`] driving the flow
//! - **provider**: HTTP client for the WakaTime OAuth and stats endpoints
//! - **routes**: axum router serving the browser-facing callback leg
//! - **commands / formatters / chart**: the chat-facing surface
//!
//! ## Example
//!
//! ```rust,no_run
//! use wakatime_bridge::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("callback served at {}", config.redirect_uri());
//!     Ok(())
//! }
//! ```

/// Pie-chart data shaping for stats sections
pub mod chart;

/// Chat command surface (`auth`, `auth.check`, `auth.revoke`, `stats`)
pub mod commands;

/// Environment-driven configuration
pub mod config;

/// Persistence layer for pending authorizations and sessions
pub mod database;

/// Tagged error kinds for the linking protocol
pub mod errors;

/// Localization of replies and errors into chat text
pub mod formatters;

/// Tracing subscriber setup
pub mod logging;

/// Core data records
pub mod models;

/// The authorization-linking protocol
pub mod oauth;

/// WakaTime HTTP client
pub mod provider;

/// Shared server resources
pub mod resources;

/// HTTP routes for the callback leg
pub mod routes;
