use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the atlas API server, without trailing slash.
    pub base_url: String,
    /// Freshness window for cached hour snapshots.
    pub hour_ttl: Duration,
    /// Freshness window for cached datasets.
    pub dataset_ttl: Duration,
    /// Extra attempts after a failed fetch.
    pub retries: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            hour_ttl: Duration::from_secs(60),
            dataset_ttl: Duration::from_secs(5 * 60),
            retries: 1,
            request_timeout: Duration::from_secs(30),
        }
    }
}
