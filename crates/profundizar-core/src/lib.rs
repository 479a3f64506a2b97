//! Core types for the profundizar drill-down heatmap engine.
//!
//! This crate provides the foundational types used throughout profundizar:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input events: [`Event`]
//! - The labeled value tree the chart renders: [`ValueTree`]
//! - The seam to the host rendering surface: [`Surface`]

mod color;
mod constraints;
mod event;
mod geometry;
mod surface;
mod tree;

pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use event::{Event, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use surface::{FixedMetrics, Surface};
pub use tree::{NodeData, NodeId, ValueTree};
