use atlas_core::error::CoreError;

/// Errors surfaced by [`DashboardClient`](crate::DashboardClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The server answered with a non-2xx status.
    #[error("fetch failed with status {status}")]
    FetchFailed { status: u16 },

    /// The request itself failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether another attempt could succeed. Input validation errors are
    /// deterministic and never retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ClientError::Core(_))
    }
}
