pub mod client;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod ws;

use ws::registry::ConnectionRegistry;

/// Shared application state, injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: ConnectionRegistry,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
