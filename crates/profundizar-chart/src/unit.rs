//! Display units for value presentation.

use serde::{Deserialize, Serialize};

/// How values are presented in labels and the legend.
///
/// The unit affects presentation only — never the grid or the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayUnit {
    /// Unadorned numbers
    None,
    /// Currency amounts
    #[default]
    Currency,
    /// Percentages
    Percent,
}

impl DisplayUnit {
    /// Parse a unit name, case-insensitively.
    ///
    /// Unrecognized names fall back to Currency.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "percent" => Self::Percent,
            _ => Self::Currency,
        }
    }

    /// Basic rendering of a value in this unit, used for legend labels.
    /// Hosts needing locale-aware output format values themselves.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::None => format!("{value:.0}"),
            Self::Currency => format!("${value:.2}"),
            Self::Percent => format!("{value:.1}%"),
        }
    }
}
