//! Balloon telemetry: hour buckets, payload repair and point normalization.
//!
//! The upstream feed publishes one JSON document per hour bucket (`00.json`
//! is the latest, `23.json` the oldest). Documents are frequently truncated
//! or wrapped in junk, and individual records vary in shape, so everything
//! here degrades instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dataset::coerce_number;
use crate::error::CoreError;

pub const MIN_HOUR: i64 = 0;
pub const MAX_HOUR: i64 = 23;

// ---------------------------------------------------------------------------
// Hour buckets
// ---------------------------------------------------------------------------

/// Validate a client-supplied hour offset (inclusive `0..=23`).
pub fn validate_hour(hour: i64) -> Result<u8, CoreError> {
    if (MIN_HOUR..=MAX_HOUR).contains(&hour) {
        Ok(hour as u8)
    } else {
        Err(CoreError::InvalidHour(hour))
    }
}

/// Two-digit, zero-padded hour code, e.g. `7` becomes `"07"`.
pub fn format_hour(hour: u8) -> String {
    format!("{hour:02}")
}

/// Best-effort two-character hour code from an unvalidated path segment.
///
/// Left-pads with `0` to two characters, then keeps the first two. Input is
/// not required to be numeric: `"7"` gives `"07"`, `"123"` gives `"12"` and
/// `"abc"` gives `"ab"`.
pub fn hour_code(raw: &str) -> String {
    let len = raw.chars().count();
    let padding = 2usize.saturating_sub(len);
    std::iter::repeat('0')
        .take(padding)
        .chain(raw.chars())
        .take(2)
        .collect()
}

// ---------------------------------------------------------------------------
// Payload repair
// ---------------------------------------------------------------------------

/// The span from the first `[` to the last `]`, inclusive, when the closing
/// bracket comes after the opening one.
pub fn bracketed_span(text: &str) -> Option<&str> {
    let first = text.find('[')?;
    let last = text.rfind(']')?;
    (last > first).then(|| &text[first..=last])
}

/// Parse JSON, falling back to the bracketed span when the full text is not
/// valid JSON.
///
/// Returns `None` when neither attempt parses; the caller decides whether
/// that means pass-through or an empty result.
pub fn repair_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    let span = bracketed_span(text)?;
    serde_json::from_str(span).ok()
}

/// Recover the array of raw records from a proxied telemetry payload.
///
/// Anything that does not yield a JSON array (unparseable text, an error
/// object from the proxy, a bare number) gives `None`.
pub fn recover_point_array(text: &str) -> Option<Vec<Value>> {
    match repair_json(text)? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// One balloon position. `alt` is absent when the record had no third
/// element or it was not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
}

impl LocationPoint {
    /// Normalize one upstream record shaped `[lon, lat, alt?]`.
    ///
    /// Returns `None` for non-arrays, arrays with fewer than two elements, and
    /// records whose latitude or longitude is not a finite number.
    pub fn from_record(record: &Value) -> Option<Self> {
        let items = record.as_array()?;
        if items.len() < 2 {
            return None;
        }
        let lon = coerce_json_number(&items[0])?;
        let lat = coerce_json_number(&items[1])?;
        let alt = items.get(2).and_then(coerce_json_number);
        Some(Self { lat, lon, alt })
    }

    /// Marker label: coordinates to five decimals, altitude when known.
    pub fn label(&self) -> String {
        match self.alt {
            Some(alt) => format!("lat: {:.5}, lon: {:.5}, alt: {alt}", self.lat, self.lon),
            None => format!("lat: {:.5}, lon: {:.5}", self.lat, self.lon),
        }
    }
}

/// Numbers pass through, numeric strings are parsed; everything else
/// (including `null` and booleans) is treated as missing.
fn coerce_json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_number(s),
        _ => None,
    }
}

/// Normalize raw records, silently dropping the ones that fail validation.
pub fn normalize_points(records: &[Value]) -> Vec<LocationPoint> {
    records.iter().filter_map(LocationPoint::from_record).collect()
}

/// Full client-side pipeline: repair the payload, then normalize. Any
/// failure along the way yields an empty list.
pub fn points_from_payload(text: &str) -> Vec<LocationPoint> {
    recover_point_array(text)
        .map(|records| normalize_points(&records))
        .unwrap_or_default()
}
