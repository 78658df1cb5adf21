//! Handlers for the static climate datasets.
//!
//! Serves the CSV files as-is (invalid UTF-8 is replaced); parsing happens on
//! the client so the server never rejects a file for its content.

use std::io::ErrorKind;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use atlas_core::dataset::DatasetKind;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

// ---------------------------------------------------------------------------
// GET /csv/{name}
// ---------------------------------------------------------------------------

/// Return the raw CSV for one of the built-in datasets.
///
/// The name is validated against [`DatasetKind`] before touching the file
/// system, so only the three known files can ever be read.
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let kind: DatasetKind = name.parse()?;
    let path = state.config.data_dir.join(kind.file_name());

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::InternalError(format!("reading {}: {e}", path.display())),
    })?;

    // Spreadsheet exports are not always UTF-8; invalid bytes become U+FFFD.
    let content = String::from_utf8_lossy(&bytes).into_owned();

    tracing::debug!(%kind, bytes = bytes.len(), "Serving dataset");
    Ok(([(CONTENT_TYPE, CSV_CONTENT_TYPE)], content))
}
