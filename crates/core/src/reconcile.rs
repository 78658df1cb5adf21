//! Joining map features to dataset rows.
//!
//! The matching cascade, evaluated in order (first success wins, no
//! backtracking):
//!
//! 1. [`MatchRule::Iso3`]: the feature's ISO3 property equals a row identity.
//! 2. [`MatchRule::Name`]: normalized names are equal or one contains the
//!    other (`unitedstatesofamerica` contains `unitedstates`).
//! 3. [`MatchRule::RawId`]: the feature's opaque id equals a row identity.
//!
//! Within a rule the first qualifying row in iteration order wins. Under
//! substring containment this is order-sensitive (`guinea` is contained in
//! `guineabissau`), which is accepted behavior.

use serde::Serialize;

use crate::dataset::DatasetRow;
use crate::geo::GeoFeature;

/// Which step of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Iso3,
    Name,
    RawId,
}

/// A successful reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub row: &'a DatasetRow,
    pub rule: MatchRule,
}

/// Lower-case and drop every character outside `[a-z0-9]`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Resolve the row describing `feature`, reporting the rule that matched.
pub fn resolve<'a>(feature: &GeoFeature, rows: &'a [DatasetRow]) -> Option<Resolution<'a>> {
    let by_iso = || {
        let iso = feature.iso3.as_deref()?;
        find_by_identity(rows, iso).map(|row| Resolution { row, rule: MatchRule::Iso3 })
    };
    let by_name = || {
        let name = feature.name.as_deref().filter(|n| !n.is_empty())?;
        find_by_name(rows, name).map(|row| Resolution { row, rule: MatchRule::Name })
    };
    let by_id = || {
        let id = feature.id.as_deref().filter(|id| !id.is_empty())?;
        find_by_identity(rows, id).map(|row| Resolution { row, rule: MatchRule::RawId })
    };

    by_iso().or_else(by_name).or_else(by_id)
}

/// Resolve the row describing `feature`, if any.
pub fn resolve_row<'a>(feature: &GeoFeature, rows: &'a [DatasetRow]) -> Option<&'a DatasetRow> {
    resolve(feature, rows).map(|r| r.row)
}

/// Exact, case-sensitive comparison against the trimmed row identity. The
/// candidate itself is not trimmed.
fn find_by_identity<'a>(rows: &'a [DatasetRow], candidate: &str) -> Option<&'a DatasetRow> {
    rows.iter().find(|row| row.identity() == Some(candidate))
}

fn find_by_name<'a>(rows: &'a [DatasetRow], feature_name: &str) -> Option<&'a DatasetRow> {
    let wanted = normalize_name(feature_name);

    // Only raw names must be non-empty; an empty normalized form is contained
    // in every other name and matches the first named row.
    rows.iter().find(|row| {
        let Some(name) = row.name() else {
            return false;
        };
        let candidate = normalize_name(name);
        candidate == wanted || wanted.contains(&candidate) || candidate.contains(&wanted)
    })
}
