//! Telemetry proxy handler.

use axum::extract::{Path, State};

use atlas_core::telemetry::hour_code;

use crate::error::AppResult;
use crate::state::AppState;
use crate::upstream::ProxyPayload;

// ---------------------------------------------------------------------------
// GET /treasure/{hour}
// ---------------------------------------------------------------------------

/// Proxy one hour bucket from the telemetry upstream.
///
/// The path segment is turned into a two-character code without validation
/// (the client layer owns range checks). Upstream failures map to 502; a
/// body that cannot be repaired is forwarded as-is with a JSON content type.
pub async fn get_hour(
    State(state): State<AppState>,
    Path(raw_hour): Path<String>,
) -> AppResult<ProxyPayload> {
    let code = hour_code(&raw_hour);
    let payload = state.upstream.proxy_hour(&code).await?;

    match &payload {
        ProxyPayload::Json(value) => {
            let records = value.as_array().map(Vec::len);
            tracing::debug!(hour = %code, ?records, "Forwarding upstream JSON");
        }
        ProxyPayload::Raw(text) => {
            tracing::warn!(hour = %code, bytes = text.len(), "Upstream payload unrepairable, passing through");
        }
    }

    Ok(payload)
}
