//! Drill-down heatmap engine for labeled value trees.
//!
//! The pipeline: a [`ValueTree`](profundizar_core::ValueTree) plus a display
//! depth is flattened into a rectangular colspan [`Grid`]; the grid's leaf
//! values drive quartile [`LegendThresholds`] that pick heatmap colors; raw
//! pointer hits pass through a [`ClickArbiter`] that separates single clicks
//! (drill down) from double clicks (drill up); the [`Heatmap`] widget owns
//! the navigation state and emits [`HeatmapHit`] messages the host answers
//! by choosing a new root.

pub mod click;
pub mod flatten;
pub mod heatmap;
pub mod legend;
pub mod unit;

pub use click::{ClickArbiter, ClickConfig, DrillDirection, DrillIntent};
pub use flatten::{Cell, CellId, Grid, Row};
pub use heatmap::{Heatmap, HeatmapHit};
pub use legend::{HeatPalette, LegendThresholds};
pub use unit::DisplayUnit;
