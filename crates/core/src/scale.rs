//! Value domains and color scales for the choropleth layer.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::dataset::{DatasetKind, DatasetRow};

/// An sRGB color, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation per channel, rounded to the nearest integer.
    /// `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill for features without a reconciled, numeric value.
pub const NEUTRAL_FILL: Rgb = Rgb::new(0xf5, 0xf4, 0xf6);

impl DatasetKind {
    /// Low and high end colors of the gradient for this dataset.
    pub fn color_range(self) -> (Rgb, Rgb) {
        match self {
            DatasetKind::Food => (Rgb::new(0xff, 0xf9, 0xdb), Rgb::new(0xff, 0xd5, 0x4f)),
            DatasetKind::Water => (Rgb::new(0xe6, 0xf7, 0xff), Rgb::new(0x2b, 0x8c, 0xff)),
            DatasetKind::Vulnerability => {
                (Rgb::new(0xff, 0xed, 0xea), Rgb::new(0xff, 0x52, 0x33))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Domain {
    /// Min and max of the finite values; `[0, 1]` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min.is_finite() && max.is_finite() {
            Self { min, max }
        } else {
            Self::default()
        }
    }

    /// Domain of one column across all rows.
    pub fn of_column(rows: &[DatasetRow], column: &str) -> Self {
        Self::from_values(rows.iter().filter_map(|row| row.value(column)))
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`. A degenerate
    /// domain maps everything to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// ColorScale
// ---------------------------------------------------------------------------

/// Linear, clamped two-color scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub domain: Domain,
    pub low: Rgb,
    pub high: Rgb,
}

impl ColorScale {
    pub fn new(domain: Domain, kind: DatasetKind) -> Self {
        let (low, high) = kind.color_range();
        Self { domain, low, high }
    }

    /// Build a scale over `column`; without a column the domain is `[0, 1]`.
    pub fn for_column(rows: &[DatasetRow], column: Option<&str>, kind: DatasetKind) -> Self {
        let domain = column
            .map(|c| Domain::of_column(rows, c))
            .unwrap_or_default();
        Self::new(domain, kind)
    }

    /// Interpolated color for a finite value.
    pub fn color(&self, value: f64) -> Rgb {
        self.low.lerp(self.high, self.domain.normalize(value))
    }

    /// Color for a reconciled value; [`NEUTRAL_FILL`] when absent or not
    /// finite.
    pub fn fill(&self, value: Option<f64>) -> Rgb {
        match value {
            Some(v) if v.is_finite() => self.color(v),
            _ => NEUTRAL_FILL,
        }
    }
}
