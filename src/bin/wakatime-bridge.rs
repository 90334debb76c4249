// ABOUTME: Server binary hosting the OAuth callback leg of the linking protocol
// ABOUTME: Loads env configuration, opens the SQLite store, and serves the axum router
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # WakaTime Bridge Server Binary
//!
//! Starts the HTTP server that receives the provider's OAuth redirects.
//! The chat-facing command surface is a library API consumed by the host
//! chat framework; only the browser-facing callback needs a listener.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use wakatime_bridge::{
    config::ServerConfig,
    database::SqliteStore,
    logging,
    provider::WakaTimeClient,
    resources::ServerResources,
    routes,
};

#[derive(Parser)]
#[command(name = "wakatime-bridge")]
#[command(about = "Chat-bot bridge linking chat identities to WakaTime accounts via OAuth2")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting WakaTime Bridge");
    info!("{}", config.summary());

    let store = SqliteStore::new(&config.database_url).await?;
    store.migrate().await?;
    info!("Database ready at {}", config.database_url);

    let provider = WakaTimeClient::new(config.oauth.clone());
    let resources = Arc::new(ServerResources::new(Arc::new(store), provider, config.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Callback server listening on {addr}");

    axum::serve(listener, routes::router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // Serve until interrupted; a failed signal hook would otherwise spin
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
