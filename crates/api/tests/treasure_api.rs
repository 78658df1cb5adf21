//! Integration tests for the telemetry proxy, `GET /api/treasure/{hour}`.
//!
//! Each test runs against a fake upstream on an ephemeral port; see
//! `common::spawn_fake_upstream` for the canned responses.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, content_type, get};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: hour codes are padded to two characters before proxying
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_digit_hour_is_zero_padded() {
    let dir = common::data_dir();
    let (upstream, hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/7").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*hits.lock().unwrap(), vec!["/treasure/07.json".to_string()]);
}

#[tokio::test]
async fn every_valid_hour_requests_its_padded_file() {
    let dir = common::data_dir();
    let (upstream, hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    for hour in 0..=23u8 {
        get(app.clone(), &format!("/api/treasure/{hour}")).await;
    }

    let expected: Vec<String> = (0..=23u8)
        .map(|hour| format!("/treasure/{hour:02}.json"))
        .collect();
    assert_eq!(*hits.lock().unwrap(), expected);
}

#[tokio::test]
async fn long_hour_is_truncated_to_two_characters() {
    let dir = common::data_dir();
    let (upstream, hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/123").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*hits.lock().unwrap(), vec!["/treasure/12.json".to_string()]);
}

#[tokio::test]
async fn out_of_range_hour_is_proxied_unvalidated() {
    let dir = common::data_dir();
    let (upstream, hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/99").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
    assert_eq!(*hits.lock().unwrap(), vec!["/treasure/99.json".to_string()]);
}

// ---------------------------------------------------------------------------
// Test: payload repair
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_payload_is_forwarded_as_json() {
    let dir = common::data_dir();
    let (upstream, _hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/00").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));
    assert_eq!(
        body_json(response).await,
        json!([[-122.4, 37.8, 12.5], [2.35, 48.85]])
    );
}

#[tokio::test]
async fn wrapped_payload_is_repaired() {
    let dir = common::data_dir();
    let (upstream, _hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([[1, 2], [3, 4]]));
}

#[tokio::test]
async fn unrepairable_payload_passes_through_raw() {
    let dir = common::data_dir();
    let (upstream, _hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/02").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");
    assert_eq!(body_text(response).await, "<html>maintenance</html>");
}

// ---------------------------------------------------------------------------
// Test: upstream failures map to 502
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_error_status_returns_502() {
    let dir = common::data_dir();
    let (upstream, hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/03").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "upstream error");
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    // No retry on the server side.
    assert_eq!(hits.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn upstream_not_found_returns_502() {
    let dir = common::data_dir();
    let (upstream, _hits) = common::spawn_fake_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/04").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unreachable_upstream_returns_502() {
    let dir = common::data_dir();
    let upstream = common::unreachable_upstream().await;
    let app = common::build_test_app(dir.path(), &upstream);

    let response = get(app, "/api/treasure/05").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "upstream fetch failed");
    assert_eq!(json["code"], "UPSTREAM_UNREACHABLE");
}
