pub mod datasets;
pub mod health;
pub mod treasure;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /csv/{name}                                      raw dataset CSV
/// /treasure/{hour}                                 telemetry proxy
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/csv", datasets::router())
        .nest("/treasure", treasure::router())
}
