//! HTTP consumer of the atlas API.

use std::sync::Arc;

use serde::Serialize;

use atlas_core::choropleth::{paint_features, Choropleth};
use atlas_core::csv::parse_csv;
use atlas_core::dataset::{Dataset, DatasetKind};
use atlas_core::geo::{features_from_topology, GeoFeature};
use atlas_core::telemetry::{
    format_hour, normalize_points, recover_point_array, validate_hour, LocationPoint,
};

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::retry::with_retry;

/// Everything needed to render one map frame.
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub hour: u8,
    pub points: Arc<Vec<LocationPoint>>,
    pub choropleth: Choropleth,
    /// Set when the dataset could not be loaded; the choropleth is then
    /// rendered entirely in the neutral color.
    pub dataset_error: Option<String>,
}

/// Client for the atlas API with per-key result caches.
pub struct DashboardClient {
    http: reqwest::Client,
    config: ClientConfig,
    hours: QueryCache<u8, Arc<Vec<LocationPoint>>>,
    datasets: QueryCache<DatasetKind, Arc<Dataset>>,
}

impl DashboardClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            hours: QueryCache::new(config.hour_ttl),
            datasets: QueryCache::new(config.dataset_ttl),
            http,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn hour_url(&self, hour: u8) -> String {
        format!("{}/api/treasure/{}", self.config.base_url, format_hour(hour))
    }

    pub fn dataset_url(&self, kind: DatasetKind) -> String {
        format!("{}/api/csv/{}", self.config.base_url, kind)
    }

    // ---- uncached fetches ----

    /// Fetch and normalize one hour of balloon positions.
    ///
    /// Only an out-of-range hour is an error, and it is raised before any
    /// request is sent. A failed request is retried once; if it still fails,
    /// or the payload is unrecoverable, the result is an empty list.
    pub async fn fetch_hour(&self, hour: i64) -> Result<Vec<LocationPoint>, ClientError> {
        let hour = validate_hour(hour)?;
        Ok(self.load_hour(hour).await.unwrap_or_default())
    }

    /// Fetch and parse one dataset. A non-2xx status fails with
    /// [`ClientError::FetchFailed`] before any parsing.
    pub async fn fetch_dataset(&self, kind: DatasetKind) -> Result<Dataset, ClientError> {
        let url = self.dataset_url(kind);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let dataset = parse_csv(&response.text().await?);
        tracing::debug!(%kind, rows = dataset.len(), "Dataset parsed");
        Ok(dataset)
    }

    /// Fetch a TopoJSON world map and extract the features of `object`
    /// (e.g. `countries`).
    pub async fn fetch_features(&self, url: &str, object: &str) -> Result<Vec<GeoFeature>, ClientError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let doc: serde_json::Value = response.json().await?;
        Ok(features_from_topology(&doc, object)?)
    }

    // ---- cached queries ----

    /// Cached variant of [`fetch_hour`](Self::fetch_hour).
    ///
    /// The empty fallback after exhausted retries is returned but not cached,
    /// so the next call asks the server again.
    pub async fn hour_points(&self, hour: i64) -> Result<Arc<Vec<LocationPoint>>, ClientError> {
        let key = validate_hour(hour)?;
        if let Some(points) = self.hours.get(&key).await {
            return Ok(points);
        }

        let ticket = self.hours.ticket();
        let Some(points) = self.load_hour(key).await else {
            return Ok(Arc::new(Vec::new()));
        };

        let points = Arc::new(points);
        if !self.hours.store(key, ticket, Arc::clone(&points)).await {
            tracing::debug!(hour = key, ticket, "Superseded hour result discarded from cache");
        }
        Ok(points)
    }

    /// Cached, retried variant of [`fetch_dataset`](Self::fetch_dataset).
    pub async fn dataset(&self, kind: DatasetKind) -> Result<Arc<Dataset>, ClientError> {
        if let Some(dataset) = self.datasets.get(&kind).await {
            return Ok(dataset);
        }

        let ticket = self.datasets.ticket();
        let dataset = Arc::new(
            with_retry(kind.as_str(), self.config.retries, || self.fetch_dataset(kind)).await?,
        );
        if !self.datasets.store(kind, ticket, Arc::clone(&dataset)).await {
            tracing::debug!(%kind, ticket, "Superseded dataset result discarded from cache");
        }
        Ok(dataset)
    }

    /// Drop cached results for one hour.
    pub async fn invalidate_hour(&self, hour: u8) {
        self.hours.invalidate(&hour).await;
    }

    /// Drop cached results for one dataset.
    pub async fn invalidate_dataset(&self, kind: DatasetKind) {
        self.datasets.invalidate(&kind).await;
    }

    // ---- composition ----

    /// Fetch the hour and the dataset concurrently and paint `features`.
    ///
    /// A dataset failure degrades to an all-neutral choropleth; only an
    /// invalid hour is returned as an error.
    pub async fn snapshot(
        &self,
        hour: i64,
        kind: DatasetKind,
        features: &[GeoFeature],
    ) -> Result<MapSnapshot, ClientError> {
        let hour_key = validate_hour(hour)?;

        let (points, dataset) = tokio::join!(self.hour_points(hour), self.dataset(kind));
        let points = points?;

        let (dataset, dataset_error) = match dataset {
            Ok(dataset) => (dataset, None),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Dataset unavailable, rendering neutral map");
                (Arc::new(Dataset::default()), Some(e.to_string()))
            }
        };

        let choropleth = paint_features(features, &dataset, kind);
        tracing::debug!(
            hour = hour_key,
            %kind,
            points = points.len(),
            matched = choropleth.matched(),
            features = features.len(),
            "Snapshot assembled",
        );

        Ok(MapSnapshot {
            hour: hour_key,
            points,
            choropleth,
            dataset_error,
        })
    }

    // ---- private helpers ----

    /// Request an hour with retry. `None` once every attempt has failed.
    async fn load_hour(&self, hour: u8) -> Option<Vec<LocationPoint>> {
        match with_retry("hour", self.config.retries, || self.request_hour(hour)).await {
            Ok(points) => Some(points),
            Err(e) => {
                tracing::warn!(hour, error = %e, "Telemetry fetch failed, using empty hour");
                None
            }
        }
    }

    /// One attempt at an hour. Network failures and non-2xx statuses are
    /// errors (and therefore retryable); an unrecoverable 2xx payload is an
    /// empty list.
    async fn request_hour(&self, hour: u8) -> Result<Vec<LocationPoint>, ClientError> {
        let url = self.hour_url(hour);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let Some(records) = recover_point_array(&text) else {
            tracing::warn!(%url, "Telemetry payload unrecoverable, using empty hour");
            return Ok(Vec::new());
        };

        let points = normalize_points(&records);
        let dropped = records.len() - points.len();
        if dropped > 0 {
            tracing::debug!(hour, dropped, kept = points.len(), "Dropped malformed records");
        }
        Ok(points)
    }
}
