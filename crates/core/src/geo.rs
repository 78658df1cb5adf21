//! Map features as seen by reconciliation.
//!
//! Features come from a third-party world topology. Depending on the build of
//! that topology a country may carry a name, an ISO3 property, a numeric
//! (ISO 3166 numeric) id, or some mix of these. Only the identifying metadata
//! is extracted; geometry is left to the renderer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Property keys holding a display name, in priority order.
const NAME_PROPERTIES: [&str; 2] = ["name", "NAME"];

/// Property keys holding an ISO3-like code, in priority order.
const ISO3_PROPERTIES: [&str; 3] = ["ISO_A3", "iso_a3", "ADM0_A3"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFeature {
    pub name: Option<String>,
    pub iso3: Option<String>,
    /// Opaque feature id, stringified. May or may not be an ISO3 code.
    pub id: Option<String>,
}

impl GeoFeature {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_iso3(mut self, iso3: impl Into<String>) -> Self {
        self.iso3 = Some(iso3.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Build a feature from a geometry/feature object's `id` and
    /// `properties`. Empty strings count as missing.
    pub fn from_json(object: &Value) -> Self {
        let properties = object.get("properties");
        let lookup = |keys: &[&str]| -> Option<String> {
            let props = properties?;
            keys.iter()
                .filter_map(|key| props.get(*key).and_then(scalar_to_string))
                .find(|s| !s.is_empty())
        };

        Self {
            name: lookup(&NAME_PROPERTIES),
            iso3: lookup(&ISO3_PROPERTIES),
            id: object
                .get("id")
                .and_then(scalar_to_string)
                .filter(|s| !s.is_empty()),
        }
    }

    /// Label for logs: name, then ISO3, then id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.iso3.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract features from a TopoJSON document's named object
/// (`objects.<object>.geometries[]`).
pub fn features_from_topology(doc: &Value, object: &str) -> Result<Vec<GeoFeature>, CoreError> {
    let geometries = doc
        .get("objects")
        .and_then(|objects| objects.get(object))
        .and_then(|o| o.get("geometries"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CoreError::Validation(format!("topology has no geometries under objects.{object}"))
        })?;

    Ok(geometries.iter().map(GeoFeature::from_json).collect())
}

/// Extract features from a GeoJSON `FeatureCollection`.
pub fn features_from_geojson(doc: &Value) -> Result<Vec<GeoFeature>, CoreError> {
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::Validation("GeoJSON document has no features array".into()))?;

    Ok(features.iter().map(GeoFeature::from_json).collect())
}
