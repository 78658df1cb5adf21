//! Route definitions for the telemetry proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::treasure;
use crate::state::AppState;

/// Routes mounted at `/treasure`.
///
/// ```text
/// GET /{hour}    -> get_hour
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{hour}", get(treasure::get_hour))
}
