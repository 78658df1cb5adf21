//! Dataset kinds and the loosely-typed row model produced by CSV ingestion.
//!
//! Rows keep every value as a string. Column sets differ per dataset, so the
//! only structure imposed is the identity field family (ISO3 codes) and the
//! name field family, both looked up lazily at reconciliation time.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identity columns, in lookup priority order.
pub const IDENTITY_FIELDS: [&str; 3] = ["ISO3", "ISO_3", "iso3"];

/// Display name columns, in lookup priority order.
pub const NAME_FIELDS: [&str; 2] = ["Name", "name"];

/// Whether a header belongs to the identity or name field families.
pub fn is_key_field(header: &str) -> bool {
    IDENTITY_FIELDS.contains(&header) || NAME_FIELDS.contains(&header)
}

/// Interpret a cell as a finite number.
///
/// Surrounding whitespace is ignored. Empty cells, non-numeric text and
/// non-finite values (`inf`, `NaN`) all yield `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// DatasetKind
// ---------------------------------------------------------------------------

/// The three built-in climate datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Food,
    Water,
    Vulnerability,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Food,
        DatasetKind::Water,
        DatasetKind::Vulnerability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Food => "food",
            DatasetKind::Water => "water",
            DatasetKind::Vulnerability => "vulnerability",
        }
    }

    /// File name of the backing CSV resource, e.g. `water.csv`.
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = CoreError;

    /// Names are matched exactly; `Food` or ` food` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::InvalidDataset(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DatasetRow
// ---------------------------------------------------------------------------

/// One CSV record keyed by header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetRow(IndexMap<String, String>);

impl DatasetRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. A repeated header keeps its first position and
    /// takes the latest value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Column names in source order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The row's ISO3-style identity.
    ///
    /// Takes the first non-empty value among [`IDENTITY_FIELDS`], then trims
    /// it. A value made only of whitespace therefore yields `None` rather than
    /// falling through to a lower-priority field.
    pub fn identity(&self) -> Option<&str> {
        let raw = first_non_empty(self, &IDENTITY_FIELDS)?;
        Some(raw.trim()).filter(|s| !s.is_empty())
    }

    /// The row's display name (first non-empty among [`NAME_FIELDS`]).
    pub fn name(&self) -> Option<&str> {
        first_non_empty(self, &NAME_FIELDS)
    }

    /// The numeric value of a column, if the cell holds a finite number.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(coerce_number)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DatasetRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = DatasetRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

fn first_non_empty<'a>(row: &'a DatasetRow, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| row.get(field))
        .find(|value| !value.is_empty())
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A parsed dataset: headers in source order plus the rows zipped against
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    /// The column used for coloring: the last header that is neither an
    /// identity nor a name field. For time-series datasets this is the most
    /// recent year.
    pub fn value_column(&self) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .map(String::as_str)
            .find(|h| !is_key_field(h))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn row(pairs: &[(&str, &str)]) -> DatasetRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn dataset_kind_parses_exact_names() {
        assert_eq!("food".parse::<DatasetKind>(), Ok(DatasetKind::Food));
        assert_eq!("water".parse::<DatasetKind>(), Ok(DatasetKind::Water));
        assert_eq!(
            "vulnerability".parse::<DatasetKind>(),
            Ok(DatasetKind::Vulnerability)
        );
    }

    #[test]
    fn dataset_kind_rejects_unknown_and_case_variants() {
        assert_matches!(
            "Food".parse::<DatasetKind>(),
            Err(CoreError::InvalidDataset(name)) if name == "Food"
        );
        assert_matches!(
            "../etc/passwd".parse::<DatasetKind>(),
            Err(CoreError::InvalidDataset(_))
        );
    }

    #[test]
    fn file_name_appends_csv() {
        assert_eq!(DatasetKind::Vulnerability.file_name(), "vulnerability.csv");
    }

    #[test]
    fn identity_prefers_iso3_then_iso_3_then_lowercase() {
        let r = row(&[("iso3", "FRA"), ("ISO_3", "DEU"), ("ISO3", "")]);
        assert_eq!(r.identity(), Some("DEU"));

        let r = row(&[("iso3", " FRA ")]);
        assert_eq!(r.identity(), Some("FRA"));
    }

    #[test]
    fn whitespace_identity_does_not_fall_through() {
        let r = row(&[("ISO3", "   "), ("iso3", "FRA")]);
        assert_eq!(r.identity(), None);
    }

    #[test]
    fn name_prefers_capitalized_field() {
        let r = row(&[("name", "lower"), ("Name", "Upper")]);
        assert_eq!(r.name(), Some("Upper"));

        let r = row(&[("Name", ""), ("name", "lower")]);
        assert_eq!(r.name(), Some("lower"));
    }

    #[test]
    fn coerce_number_accepts_only_finite_values() {
        assert_eq!(coerce_number(" 5.5 "), Some(5.5));
        assert_eq!(coerce_number("-3"), Some(-3.0));
        assert_eq!(coerce_number("1e2"), Some(100.0));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("n/a"), None);
    }

    #[test]
    fn value_column_skips_key_fields() {
        let dataset = Dataset {
            headers: vec!["ISO3".into(), "1995".into(), "2020".into(), "Name".into()],
            rows: vec![],
        };
        assert_eq!(dataset.value_column(), Some("2020"));
    }

    #[test]
    fn value_column_absent_when_only_key_fields() {
        let dataset = Dataset {
            headers: vec!["ISO3".into(), "Name".into()],
            rows: vec![],
        };
        assert_eq!(dataset.value_column(), None);
    }

    #[test]
    fn rows_serialize_as_flat_objects_in_header_order() {
        let r = row(&[("ISO3", "USA"), ("Name", "United States"), ("2020", "5.5")]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"ISO3":"USA","Name":"United States","2020":"5.5"}"#);
    }
}
