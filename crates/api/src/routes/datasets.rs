//! Route definitions for the climate datasets.

use axum::routing::get;
use axum::Router;

use crate::handlers::datasets;
use crate::state::AppState;

/// Routes mounted at `/csv`.
///
/// ```text
/// GET /{name}    -> get_dataset   (name: food | water | vulnerability)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{name}", get(datasets::get_dataset))
}
