//! The drill-down heatmap: navigation state, drill rules, and the rebuild
//! pipeline tying flattening, binning, and click arbitration together.

use crate::click::{ClickArbiter, DrillDirection, DrillIntent};
use crate::flatten::{Cell, CellId, Grid};
use crate::legend::{HeatPalette, LegendThresholds};
use crate::unit::DisplayUnit;
use profundizar_core::{
    Color, Constraints, Event, MouseButton, NodeId, Point, Rect, Size, Surface, ValueTree,
};
use std::time::Instant;

/// Pixel width of one leaf column when no explicit cap is set.
const DEFAULT_CELL_WIDTH: f32 = 96.0;
/// Pixel height of one grid row.
const ROW_HEIGHT: f32 = 32.0;

/// Message emitted when a drill request passes the navigability rules.
///
/// The host decides the new root — typically `node` for a drill-down, the
/// current root's parent for a drill-up — and answers by calling
/// [`Heatmap::change_root_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapHit {
    /// True for drill-down, false for drill-up.
    pub drill_down: bool,
    /// The root at the moment the request resolved.
    pub previous_root: NodeId,
    /// Node of the hit cell; None when an empty cell triggered a drill-up.
    pub node: Option<NodeId>,
}

/// Drill-down heatmap over a labeled value tree.
///
/// A `Heatmap` without a tree is inert: it measures to zero, renders
/// nothing, and every operation is a silent no-op. That posture is
/// deliberate — missing input is "nothing to show", never a failure.
#[derive(Debug)]
pub struct Heatmap {
    tree: Option<ValueTree>,
    root: Option<NodeId>,
    title: String,
    desired_depth: usize,
    value_index: usize,
    unit: DisplayUnit,
    max_cell_width: Option<f32>,
    navigable: bool,
    palette: HeatPalette,
    grid: Grid,
    thresholds: LegendThresholds,
    arbiter: ClickArbiter,
    generation: u64,
    bounds: Rect,
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            tree: None,
            root: None,
            title: String::new(),
            desired_depth: 1,
            value_index: 0,
            unit: DisplayUnit::default(),
            max_cell_width: None,
            navigable: false,
            palette: HeatPalette::default(),
            grid: Grid::default(),
            thresholds: LegendThresholds::default(),
            arbiter: ClickArbiter::new(),
            generation: 0,
            bounds: Rect::default(),
        }
    }
}

impl Heatmap {
    /// Create an inert heatmap; attach data with [`tree`](Self::tree).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Builder =====

    /// Attach the value tree and root the chart at its topmost node.
    #[must_use]
    pub fn tree(mut self, tree: ValueTree) -> Self {
        self.root = Some(tree.root());
        self.tree = Some(tree);
        self.rebuild();
        self
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the desired display depth, clamped to at least 1.
    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.desired_depth = depth.max(1);
        self.rebuild();
        self
    }

    /// Select which of each node's values the chart shows.
    #[must_use]
    pub fn value_index(mut self, index: usize) -> Self {
        self.value_index = index;
        self.rebuild();
        self
    }

    /// Set the display unit.
    #[must_use]
    pub const fn unit(mut self, unit: DisplayUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Cap the pixel width of one leaf column.
    #[must_use]
    pub fn max_cell_width(mut self, width: f32) -> Self {
        self.max_cell_width = Some(width.max(1.0));
        self
    }

    /// Enable drill navigation. Off by default: without a host listening
    /// for [`HeatmapHit`] messages, no cell is navigable.
    #[must_use]
    pub const fn navigable(mut self, navigable: bool) -> Self {
        self.navigable = navigable;
        self
    }

    /// Set the bucket color palette.
    #[must_use]
    pub const fn palette(mut self, palette: HeatPalette) -> Self {
        self.palette = palette;
        self
    }

    // ===== Accessors =====

    /// The current grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current legend thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &LegendThresholds {
        &self.thresholds
    }

    /// The attached tree, if any.
    #[must_use]
    pub const fn get_tree(&self) -> Option<&ValueTree> {
        self.tree.as_ref()
    }

    /// The current root node.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The chart title.
    #[must_use]
    pub fn get_title(&self) -> &str {
        &self.title
    }

    /// The display unit.
    #[must_use]
    pub const fn get_unit(&self) -> DisplayUnit {
        self.unit
    }

    /// The requested (unclamped-by-structure) display depth.
    #[must_use]
    pub const fn get_depth(&self) -> usize {
        self.desired_depth
    }

    /// The selected value index.
    #[must_use]
    pub const fn get_value_index(&self) -> usize {
        self.value_index
    }

    /// Whether drill navigation is enabled.
    #[must_use]
    pub const fn is_navigable(&self) -> bool {
        self.navigable
    }

    /// The bucket palette.
    #[must_use]
    pub const fn get_palette(&self) -> &HeatPalette {
        &self.palette
    }

    /// Rebuild counter; bumps whenever the grid is rebuilt wholesale.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Legend boundary labels in the current unit.
    #[must_use]
    pub fn legend_labels(&self) -> [String; 3] {
        self.thresholds.bounds().map(|bound| self.unit.format(bound))
    }

    /// Fill color for a cell; None for empty cells, which the host paints
    /// as background.
    #[must_use]
    pub fn cell_color(&self, id: CellId) -> Option<Color> {
        let cell = self.grid.cell(id)?;
        if cell.empty {
            return None;
        }
        Some(self.palette.color_for(cell.value, &self.thresholds))
    }

    // ===== Runtime operations =====

    /// Replace the root and rebuild. Ignored when the node is not part of
    /// the attached tree.
    pub fn change_root_node(&mut self, node: NodeId) {
        let known = self.tree.as_ref().is_some_and(|tree| tree.contains(node));
        if known {
            self.root = Some(node);
            self.rebuild();
        }
    }

    /// Change the display depth (clamped to at least 1) and rebuild.
    pub fn change_depth(&mut self, depth: usize) {
        self.desired_depth = depth.max(1);
        self.rebuild();
    }

    /// Switch the selected value index.
    ///
    /// Values and thresholds are recomputed in place; cell identity is
    /// preserved, so this is not a rebuild and pending clicks stay valid.
    pub fn change_value_index(&mut self, index: usize) {
        self.value_index = index;
        if let Some(tree) = &self.tree {
            self.grid.refresh_values(tree, index);
        }
        self.thresholds = LegendThresholds::compute(self.grid.leaf_values());
    }

    /// Switch the display unit. Presentation only: neither the grid nor
    /// the thresholds change.
    pub fn change_unit(&mut self, unit: DisplayUnit) {
        self.unit = unit;
    }

    fn rebuild(&mut self) {
        self.grid = match (&self.tree, self.root) {
            (Some(tree), Some(root)) => {
                Grid::flatten(tree, root, self.desired_depth, self.value_index)
            }
            _ => Grid::default(),
        };
        self.thresholds = LegendThresholds::compute(self.grid.leaf_values());
        self.generation += 1;
    }

    // ===== Layout =====

    /// Preferred size under the given constraints.
    #[must_use]
    pub fn measure(&self, constraints: Constraints) -> Size {
        let preferred = if self.grid.is_empty() {
            Size::ZERO
        } else {
            Size::new(
                self.grid.num_max_colspan() as f32
                    * self.max_cell_width.unwrap_or(DEFAULT_CELL_WIDTH),
                self.grid.rows().len() as f32 * ROW_HEIGHT,
            )
        };
        constraints.constrain(preferred)
    }

    /// Place the chart within `bounds`.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Place the chart to fill the surface's viewport.
    pub fn layout_to(&mut self, surface: &dyn Surface) {
        self.layout(Rect::from_size(surface.viewport()));
    }

    /// The bounds set by the last layout.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    fn cell_width(&self) -> f32 {
        let slots = self.grid.num_max_colspan();
        if slots == 0 {
            return 0.0;
        }
        let width = self.bounds.width / slots as f32;
        self.max_cell_width.map_or(width, |cap| width.min(cap))
    }

    fn row_height(&self) -> f32 {
        let rows = self.grid.rows().len();
        if rows == 0 {
            0.0
        } else {
            self.bounds.height / rows as f32
        }
    }

    /// Pixel rectangle of a cell under the current layout.
    #[must_use]
    pub fn cell_rect(&self, id: CellId) -> Option<Rect> {
        let cell = self.grid.cell(id)?;
        let cell_width = self.cell_width();
        let row_height = self.row_height();
        Some(Rect::new(
            (cell.col_index as f32).mul_add(cell_width, self.bounds.x),
            (cell.row_index as f32).mul_add(row_height, self.bounds.y),
            cell.colspan as f32 * cell_width,
            row_height,
        ))
    }

    /// Find the cell under a point, if any.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<CellId> {
        self.grid
            .cells()
            .map(|cell| cell.id)
            .find(|id| self.cell_rect(*id).is_some_and(|rect| rect.contains_point(&point)))
    }

    // ===== Pointer flow =====

    /// Feed a host input event into the chart.
    pub fn event(&mut self, event: &Event) -> Option<HeatmapHit> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                if let Some(cell) = self.hit_test(*position) {
                    self.pointer_hit(cell, Instant::now());
                }
                None
            }
            Event::Resize { width, height } => {
                self.bounds.width = *width;
                self.bounds.height = *height;
                None
            }
            _ => None,
        }
    }

    /// Register a pointer hit on a cell at time `now`. Unknown cell ids
    /// are ignored.
    pub fn pointer_hit(&mut self, cell: CellId, now: Instant) {
        if self.grid.cell(cell).is_some() {
            self.arbiter.press(cell, self.generation, now);
        }
    }

    /// Drive the click deadline. Call periodically; returns a hit message
    /// once a window resolves into a permitted drill request.
    ///
    /// Intents captured before the last rebuild refer to discarded cells
    /// and are silently dropped.
    pub fn poll_clicks(&mut self, now: Instant) -> Option<HeatmapHit> {
        let intent = self.arbiter.poll(now)?;
        if intent.generation != self.generation {
            return None;
        }
        self.apply(&intent)
    }

    /// Discard any pending click window.
    pub fn cancel_clicks(&mut self) {
        self.arbiter.cancel();
    }

    /// Navigability of a cell: drilling must be enabled, and either the
    /// chart is already drilled in (any cell can drill up) or the cell
    /// names a non-root node with children.
    #[must_use]
    pub fn can_drill(&self, cell: &Cell) -> bool {
        if !self.navigable {
            return false;
        }
        let (Some(tree), Some(root)) = (self.tree.as_ref(), self.root) else {
            return false;
        };
        if tree.parent(root).is_some() {
            return true;
        }
        !cell.empty
            && cell.level > 0
            && cell.node.is_some_and(|node| tree.has_children(node))
    }

    fn apply(&self, intent: &DrillIntent) -> Option<HeatmapHit> {
        let tree = self.tree.as_ref()?;
        let root = self.root?;
        let cell = self.grid.cell(intent.cell)?;
        if !self.can_drill(cell) {
            return None;
        }
        match intent.direction {
            DrillDirection::Down => {
                let node = cell.node?;
                if cell.empty || cell.level == 0 || !tree.has_children(node) {
                    return None;
                }
                Some(HeatmapHit {
                    drill_down: true,
                    previous_root: root,
                    node: Some(node),
                })
            }
            DrillDirection::Up => {
                tree.parent(root)?;
                Some(HeatmapHit {
                    drill_down: false,
                    previous_root: root,
                    node: cell.node,
                })
            }
        }
    }
}
