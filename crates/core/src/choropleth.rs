//! Per-feature fills: reconciliation joined with the color scale.

use serde::Serialize;

use crate::dataset::{Dataset, DatasetKind};
use crate::geo::GeoFeature;
use crate::reconcile::{resolve, MatchRule};
use crate::scale::{ColorScale, Domain, Rgb};

/// Fill decision for one map feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureFill {
    pub feature: GeoFeature,
    /// How the feature was joined to a row; `None` when unmatched.
    pub rule: Option<MatchRule>,
    /// Finite value of the matched row's value column.
    pub value: Option<f64>,
    pub fill: Rgb,
}

/// Choropleth layer for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choropleth {
    pub kind: DatasetKind,
    pub column: Option<String>,
    pub domain: Domain,
    pub fills: Vec<FeatureFill>,
}

impl Choropleth {
    pub fn matched(&self) -> usize {
        self.fills.iter().filter(|f| f.rule.is_some()).count()
    }
}

/// Build the scale for a dataset's value column.
pub fn build_scale(dataset: &Dataset, kind: DatasetKind) -> ColorScale {
    ColorScale::for_column(&dataset.rows, dataset.value_column(), kind)
}

/// Join every feature to the dataset and compute its fill.
pub fn paint_features(features: &[GeoFeature], dataset: &Dataset, kind: DatasetKind) -> Choropleth {
    let column = dataset.value_column();
    let scale = build_scale(dataset, kind);

    let fills = features
        .iter()
        .map(|feature| {
            let resolution = resolve(feature, &dataset.rows);
            let value = resolution
                .zip(column)
                .and_then(|(res, col)| res.row.value(col));
            FeatureFill {
                feature: feature.clone(),
                rule: resolution.map(|r| r.rule),
                value,
                fill: scale.fill(value),
            }
        })
        .collect();

    Choropleth {
        kind,
        column: column.map(str::to_string),
        domain: scale.domain,
        fills,
    }
}
