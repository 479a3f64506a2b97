//! Quartile binning: legend thresholds and the heat palette.

use profundizar_core::Color;
use serde::{Deserialize, Serialize};

/// Three ascending boundaries partitioning leaf values into four buckets.
///
/// Bucket 0 holds values below the first boundary, bucket 3 values at or
/// above the third. Boundaries are rounded to the nearest integer and the
/// lowest bucket always spans at least 0..first, because zero is folded
/// into the minimum even when every value is positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendThresholds {
    bounds: [f64; 3],
}

impl LegendThresholds {
    /// Number of buckets the boundaries partition values into.
    pub const BUCKETS: usize = 4;

    /// Compute boundaries from the realized leaf values.
    ///
    /// An empty value set yields all-zero boundaries. When every value is
    /// equal and non-positive the boundaries collapse onto that value and
    /// classification degenerates: values strictly below it land in bucket
    /// 0, everything else in bucket 3. That is the literal consequence of
    /// the quartile formula and is kept as-is.
    #[must_use]
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for value in values {
            seen = true;
            min = min.min(value);
            max = max.max(value);
        }
        if !seen {
            return Self::default();
        }

        let min_v = min.min(0.0);
        let step = (max - min_v) / 4.0;
        Self {
            bounds: [
                step.mul_add(1.0, min_v).round(),
                step.mul_add(2.0, min_v).round(),
                step.mul_add(3.0, min_v).round(),
            ],
        }
    }

    /// The three boundaries, ascending.
    #[must_use]
    pub const fn bounds(&self) -> [f64; 3] {
        self.bounds
    }

    /// Bucket index in `0..=3` for a value. Values are never clamped; a
    /// value below zero still lands in bucket 0.
    #[must_use]
    pub fn bucket_of(&self, value: f64) -> usize {
        if value < self.bounds[0] {
            0
        } else if value < self.bounds[1] {
            1
        } else if value < self.bounds[2] {
            2
        } else {
            3
        }
    }
}

/// Four fill colors, one per bucket, cool to warm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPalette {
    colors: [Color; 4],
}

impl Default for HeatPalette {
    fn default() -> Self {
        Self {
            colors: [
                Color::rgb(0.0, 0.2, 1.0),
                Color::rgb(0.33, 0.2, 0.67),
                Color::rgb(0.67, 0.2, 0.33),
                Color::rgb(1.0, 0.2, 0.0),
            ],
        }
    }
}

impl HeatPalette {
    /// Create a palette from four bucket colors, coolest first.
    #[must_use]
    pub const fn new(colors: [Color; 4]) -> Self {
        Self { colors }
    }

    /// Color of a bucket; out-of-range indices saturate at the hottest.
    #[must_use]
    pub fn bucket_color(&self, bucket: usize) -> Color {
        self.colors[bucket.min(3)]
    }

    /// Color for a value under the given thresholds.
    #[must_use]
    pub fn color_for(&self, value: f64, thresholds: &LegendThresholds) -> Color {
        self.bucket_color(thresholds.bucket_of(value))
    }

    /// All four bucket colors.
    #[must_use]
    pub const fn colors(&self) -> [Color; 4] {
        self.colors
    }
}
