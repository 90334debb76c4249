// ABOUTME: Shared server resources handed to routes and command handlers
// ABOUTME: Explicit dependency injection instead of ambient global context
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared resources constructed once at startup

use crate::config::ServerConfig;
use crate::database::LinkStore;
use crate::oauth::AuthManager;
use crate::provider::WakaTimeClient;
use std::sync::Arc;

/// Everything a request handler needs, built once and shared via `Arc`
pub struct ServerResources {
    /// The linking-protocol manager
    pub manager: AuthManager,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Assemble resources from explicit store, provider, and config handles
    #[must_use]
    pub fn new(store: Arc<dyn LinkStore>, provider: WakaTimeClient, config: ServerConfig) -> Self {
        Self {
            manager: AuthManager::new(store, provider, config.clone()),
            config,
        }
    }
}
