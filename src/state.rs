// src/state.rs
use crate::config::Config;
use crate::services::orats::{FetchError, OratsClient};

/// Shared by every request for the lifetime of the server.
pub struct AppState {
    pub client: OratsClient,
    pub live_price: bool,
    pub default_ticker: String,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: OratsClient::new(config)?,
            live_price: config.live_price,
            default_ticker: config.default_ticker.clone(),
        })
    }
}
