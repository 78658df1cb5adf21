#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path as UrlPath, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use atlas_api::config::ServerConfig;
use atlas_api::router::build_app_router;
use atlas_api::state::AppState;

pub const FOOD_CSV: &str = "ISO3,Name,2019,2020\nUSA,\"United, States\",1.5,2\nFRA,France,3,8\n";
pub const WATER_CSV: &str = "ISO3,Name,2020\r\nNOR,Norway,4\r\n";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(data_dir: &Path, upstream_base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        data_dir: data_dir.to_path_buf(),
        upstream_base_url: upstream_base_url.to_string(),
        upstream_timeout_secs: 5,
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(data_dir: &Path, upstream_base_url: &str) -> Router {
    let config = test_config(data_dir, upstream_base_url);
    let state = AppState::from_config(config.clone()).unwrap();
    build_app_router(state, &config)
}

/// A data directory with `food.csv` and `water.csv`. `vulnerability.csv` is
/// intentionally absent.
pub fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("food.csv"), FOOD_CSV).unwrap();
    std::fs::write(dir.path().join("water.csv"), WATER_CSV).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get("content-type")
        .expect("missing content-type")
        .to_str()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Fake telemetry upstream
// ---------------------------------------------------------------------------

/// Paths requested from the fake upstream, in order.
pub type Hits = Arc<Mutex<Vec<String>>>;

async fn fake_hour(State(hits): State<Hits>, UrlPath(file): UrlPath<String>) -> Response {
    hits.lock().unwrap().push(format!("/treasure/{file}"));

    match file.as_str() {
        "00.json" => (StatusCode::OK, "[[-122.4,37.8,12.5],[2.35,48.85]]").into_response(),
        "01.json" => (StatusCode::OK, "garbage[[1,2],[3,4]]trailing").into_response(),
        "02.json" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "03.json" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "04.json" => (StatusCode::NOT_FOUND, "").into_response(),
        _ => (StatusCode::OK, "[]").into_response(),
    }
}

/// Serve a fake upstream on an ephemeral port and return its base URL.
pub async fn spawn_fake_upstream() -> (String, Hits) {
    let hits: Hits = Arc::default();
    let router = Router::new()
        .route("/treasure/{file}", axum::routing::get(fake_hour))
        .with_state(Arc::clone(&hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}/treasure/"), hits)
}

/// A base URL nothing listens on.
pub async fn unreachable_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/treasure/")
}
