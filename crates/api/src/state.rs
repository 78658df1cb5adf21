use std::sync::Arc;

use crate::config::ServerConfig;
use crate::upstream::TreasureUpstream;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Nothing in it is
/// mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (data directory, upstream settings).
    pub config: Arc<ServerConfig>,
    /// Client for the third-party telemetry feed.
    pub upstream: Arc<TreasureUpstream>,
}

impl AppState {
    /// Build state from configuration, creating the upstream HTTP client.
    pub fn from_config(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let upstream = TreasureUpstream::new(
            config.upstream_base_url.clone(),
            std::time::Duration::from_secs(config.upstream_timeout_secs),
        )?;

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        })
    }
}
