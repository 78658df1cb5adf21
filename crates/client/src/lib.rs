//! Client-side consumer of the atlas API.
//!
//! Fetches telemetry and datasets from the proxy server, applies the same
//! repair rules as the server (so a partially fixed payload still yields
//! points), caches results for a short freshness window, and assembles the
//! map snapshot the presentation layer renders.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod retry;

pub use client::{DashboardClient, MapSnapshot};
pub use config::ClientConfig;
pub use error::ClientError;
