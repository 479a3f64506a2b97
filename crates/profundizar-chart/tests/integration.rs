//! End-to-end tests for the heatmap engine: grid shape, binning, click
//! arbitration, and drill navigation working together.

use profundizar_chart::{DisplayUnit, Grid, Heatmap, LegendThresholds};
use profundizar_core::{NodeData, Rect, ValueTree};
use proptest::prelude::*;
use std::time::{Duration, Instant};

fn node(label: &str, value: f64) -> NodeData {
    NodeData::new(label, label, [value])
}

/// Root with two children, each with two leaf children carrying 1..4.
fn two_by_two() -> ValueTree {
    let mut tree = ValueTree::new(node("R", 0.0));
    let a = tree.add_child(tree.root(), node("A", 0.0));
    let b = tree.add_child(tree.root(), node("B", 0.0));
    tree.add_child(a, node("A1", 1.0));
    tree.add_child(a, node("A2", 2.0));
    tree.add_child(b, node("B1", 3.0));
    tree.add_child(b, node("B2", 4.0));
    tree
}

fn chart_over(tree: ValueTree, depth: usize) -> Heatmap {
    let mut chart = Heatmap::new().tree(tree).depth(depth).navigable(true);
    chart.layout(Rect::new(0.0, 0.0, 400.0, 300.0));
    chart
}

// =============================================================================
// Grid shape
// =============================================================================

#[test]
fn balanced_tree_at_depth_two_renders_one_leaf_row() {
    let tree = two_by_two();
    let grid = Grid::flatten(&tree, tree.root(), 2, 0);

    // Header: root spanning everything, then two half-width cells.
    assert_eq!(grid.num_max_colspan(), 4);
    assert_eq!(grid.rows().len(), 3);
    assert_eq!(grid.rows()[0].cells()[0].colspan, 4);
    let mid: Vec<u32> = grid.rows()[1].cells().iter().map(|c| c.colspan).collect();
    assert_eq!(mid, vec![2, 2]);

    // One leaf row holding all four values left to right.
    let leaves = grid.rows()[2].cells();
    assert_eq!(leaves.len(), 4);
    assert!(leaves.iter().all(|c| c.colspan == 1 && c.leaf));
    let values: Vec<f64> = leaves.iter().map(|c| c.value).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn subtree_below_cutoff_stacks_root_to_deepest() {
    // X sits on the last header row; its subtree runs three levels deeper
    // and must stack vertically in X's column.
    let mut tree = ValueTree::new(node("R", 0.0));
    let x = tree.add_child(tree.root(), node("X", 0.0));
    let a = tree.add_child(x, node("a", 1.0));
    let b = tree.add_child(a, node("b", 2.0));
    tree.add_child(b, node("c", 3.0));

    let grid = Grid::flatten(&tree, tree.root(), 2, 0);

    assert_eq!(grid.effective_depth(), 2);
    assert_eq!(grid.num_max_colspan(), 1);
    assert_eq!(grid.leaf_row_count(), 3);

    let stacked: Vec<f64> = grid
        .cells()
        .filter(|cell| cell.leaf)
        .map(|cell| cell.value)
        .collect();
    assert_eq!(stacked, vec![1.0, 2.0, 3.0]);

    // All three share X's column.
    assert!(grid
        .cells()
        .filter(|cell| cell.leaf)
        .all(|cell| cell.col_index == 0));
}

#[test]
fn effective_depth_is_bounded_both_ways() {
    let tree = two_by_two();
    for requested in [1, 2, 3, 10] {
        let grid = Grid::flatten(&tree, tree.root(), requested, 0);
        let structural = tree.structural_depth(tree.root());
        assert!(grid.effective_depth() >= 1);
        assert!(grid.effective_depth() <= requested.max(1));
        assert!(grid.effective_depth() <= structural);
    }
}

#[test]
fn change_depth_is_idempotent_in_shape() {
    let mut chart = chart_over(two_by_two(), 2);
    let shape = |chart: &Heatmap| -> Vec<(usize, usize, u32, u32, bool)> {
        chart
            .grid()
            .cells()
            .map(|c| (c.row_index, c.level, c.col_index, c.colspan, c.empty))
            .collect()
    };

    chart.change_depth(2);
    let first = shape(&chart);
    let first_ids: Vec<_> = chart.grid().cells().map(|c| c.id).collect();

    chart.change_depth(2);
    assert_eq!(shape(&chart), first);
    // Ids are minted fresh on every rebuild.
    let second_ids: Vec<_> = chart.grid().cells().map(|c| c.id).collect();
    assert_eq!(first_ids.len(), second_ids.len());
}

// =============================================================================
// Binning
// =============================================================================

#[test]
fn uniform_leaf_values_follow_the_literal_formula() {
    // All leaves equal to 10: min folds to 0, step 2.5, boundaries [3, 5, 8],
    // and 10 classifies into the top bucket.
    let mut tree = ValueTree::new(node("R", 0.0));
    for label in ["A", "B", "C"] {
        tree.add_child(tree.root(), node(label, 10.0));
    }

    let chart = chart_over(tree, 1);
    assert_eq!(chart.thresholds().bounds(), [3.0, 5.0, 8.0]);
    assert_eq!(chart.thresholds().bucket_of(10.0), 3);
}

#[test]
fn thresholds_follow_the_selected_value_index() {
    let mut tree = ValueTree::new(NodeData::new("R", "R", [0.0, 0.0]));
    tree.add_child(tree.root(), NodeData::new("A", "A", [4.0, 400.0]));
    tree.add_child(tree.root(), NodeData::new("B", "B", [8.0, 800.0]));

    let mut chart = chart_over(tree, 1);
    assert_eq!(chart.thresholds().bounds(), [2.0, 4.0, 6.0]);

    chart.change_value_index(1);
    assert_eq!(chart.thresholds().bounds(), [200.0, 400.0, 600.0]);
}

// =============================================================================
// Click arbitration and navigation
// =============================================================================

fn drillable_cell(chart: &Heatmap) -> profundizar_chart::CellId {
    chart.grid().rows()[1].cells()[0].id
}

#[test]
fn single_hit_then_silence_drills_down() {
    let mut chart = chart_over(two_by_two(), 2);
    let cell = drillable_cell(&chart);
    let t0 = Instant::now();

    chart.pointer_hit(cell, t0);
    let mut hits = Vec::new();
    for ms in [100, 200, 299, 300, 400] {
        if let Some(hit) = chart.poll_clicks(t0 + Duration::from_millis(ms)) {
            hits.push(hit);
        }
    }

    assert_eq!(hits.len(), 1);
    assert!(hits[0].drill_down);
}

#[test]
fn two_rapid_hits_drill_up_exactly_once() {
    let tree = two_by_two();
    let a = tree.children(tree.root()).next().unwrap();
    let mut chart = Heatmap::new().tree(tree).depth(2).navigable(true);
    chart.change_root_node(a);
    chart.layout(Rect::new(0.0, 0.0, 400.0, 300.0));

    let cell = chart.grid().rows()[0].cells()[0].id;
    let t0 = Instant::now();
    chart.pointer_hit(cell, t0);
    chart.pointer_hit(cell, t0 + Duration::from_millis(150));

    let mut down = 0;
    let mut up = 0;
    for ms in [200, 300, 350, 700] {
        if let Some(hit) = chart.poll_clicks(t0 + Duration::from_millis(ms)) {
            if hit.drill_down {
                down += 1;
            } else {
                up += 1;
            }
        }
    }
    assert_eq!(down, 0);
    assert_eq!(up, 1);
}

#[test]
fn drill_down_on_childless_node_is_rejected() {
    let mut chart = chart_over(two_by_two(), 2);
    let leaf = chart.grid().rows()[2].cells()[0].id;
    let t0 = Instant::now();

    chart.pointer_hit(leaf, t0);
    assert_eq!(chart.poll_clicks(t0 + Duration::from_millis(300)), None);
}

#[test]
fn full_drill_round_trip_returns_to_top() {
    let mut chart = chart_over(two_by_two(), 2);
    let top = chart.root().unwrap();

    // Down into A.
    let t0 = Instant::now();
    chart.pointer_hit(drillable_cell(&chart), t0);
    let hit = chart.poll_clicks(t0 + Duration::from_millis(300)).unwrap();
    assert!(hit.drill_down);
    chart.change_root_node(hit.node.unwrap());
    assert_ne!(chart.root(), Some(top));

    // Double click anywhere drills back up.
    let t1 = t0 + Duration::from_secs(2);
    let any_cell = chart.grid().rows()[0].cells()[0].id;
    chart.pointer_hit(any_cell, t1);
    chart.pointer_hit(any_cell, t1 + Duration::from_millis(100));
    let hit = chart.poll_clicks(t1 + Duration::from_millis(300)).unwrap();
    assert!(!hit.drill_down);

    let tree = chart.get_tree().unwrap();
    let parent = tree.parent(hit.previous_root).unwrap();
    chart.change_root_node(parent);
    assert_eq!(chart.root(), Some(top));
}

#[test]
fn rebuild_between_capture_and_deadline_drops_the_intent() {
    let mut chart = chart_over(two_by_two(), 2);
    let cell = drillable_cell(&chart);
    let t0 = Instant::now();

    chart.pointer_hit(cell, t0);
    chart.change_depth(1);
    assert_eq!(chart.poll_clicks(t0 + Duration::from_millis(300)), None);
}

#[test]
fn unit_change_never_touches_grid_or_thresholds() {
    let mut chart = chart_over(two_by_two(), 2);
    let bounds = chart.thresholds().bounds();
    let generation = chart.generation();

    chart.change_unit(DisplayUnit::None);
    chart.change_unit(DisplayUnit::Percent);

    assert_eq!(chart.thresholds().bounds(), bounds);
    assert_eq!(chart.generation(), generation);
}

// =============================================================================
// Structural invariants over generated trees
// =============================================================================

/// Grow a tree breadth-first from a stream of child counts.
fn tree_from_counts(counts: &[usize]) -> ValueTree {
    let mut tree = ValueTree::new(node("R", 0.0));
    let mut frontier = vec![tree.root()];
    let mut next = 1.0;
    let mut cursor = 0;

    for &count in counts {
        let Some(parent) = frontier.get(cursor).copied() else {
            break;
        };
        cursor += 1;
        for _ in 0..count {
            let child = tree.add_child(parent, node("n", next));
            next += 1.0;
            frontier.push(child);
        }
    }
    tree
}

fn assert_parent_colspans_sum(grid: &Grid) {
    let header_rows = grid.effective_depth();
    for row_index in 0..header_rows.saturating_sub(1) {
        let row = &grid.rows()[row_index];
        let below = &grid.rows()[row_index + 1];
        for cell in row.cells() {
            let span_end = cell.col_index + cell.colspan;
            let child_sum: u32 = below
                .cells()
                .iter()
                .filter(|c| c.col_index >= cell.col_index && c.col_index < span_end)
                .map(|c| c.colspan)
                .sum();
            assert_eq!(child_sum, cell.colspan);
        }
    }
}

proptest! {
    #[test]
    fn prop_every_row_sums_to_total(
        counts in proptest::collection::vec(0usize..4, 1..24),
        depth in 1usize..5,
    ) {
        let tree = tree_from_counts(&counts);
        let grid = Grid::flatten(&tree, tree.root(), depth, 0);
        for row in grid.rows() {
            prop_assert_eq!(row.colspan_sum(), grid.num_max_colspan());
        }
    }

    #[test]
    fn prop_parent_colspan_equals_child_sum(
        counts in proptest::collection::vec(0usize..4, 1..24),
        depth in 1usize..5,
    ) {
        let tree = tree_from_counts(&counts);
        let grid = Grid::flatten(&tree, tree.root(), depth, 0);
        assert_parent_colspans_sum(&grid);
    }

    #[test]
    fn prop_effective_depth_bounds(
        counts in proptest::collection::vec(0usize..4, 1..24),
        depth in 1usize..8,
    ) {
        let tree = tree_from_counts(&counts);
        let grid = Grid::flatten(&tree, tree.root(), depth, 0);
        prop_assert!(grid.effective_depth() >= 1);
        prop_assert!(grid.effective_depth() <= depth);
        prop_assert!(
            grid.effective_depth() <= tree.structural_depth(tree.root()).max(1)
        );
    }

    #[test]
    fn prop_leaf_rows_rectangular(
        counts in proptest::collection::vec(0usize..4, 1..24),
        depth in 1usize..5,
    ) {
        let tree = tree_from_counts(&counts);
        let grid = Grid::flatten(&tree, tree.root(), depth, 0);
        let slots = grid.num_max_colspan() as usize;
        for row in grid.rows().iter().filter(|row| row.is_leaf()) {
            prop_assert_eq!(row.cells().len(), slots);
            prop_assert!(row.cells().iter().all(|c| c.colspan == 1));
        }
    }

    #[test]
    fn prop_bucket_monotonic_over_grid_values(
        counts in proptest::collection::vec(0usize..4, 1..24),
    ) {
        let tree = tree_from_counts(&counts);
        let grid = Grid::flatten(&tree, tree.root(), 2, 0);
        let thresholds = LegendThresholds::compute(grid.leaf_values());

        let mut values: Vec<f64> = grid.leaf_values().collect();
        values.sort_by(f64::total_cmp);
        for pair in values.windows(2) {
            prop_assert!(thresholds.bucket_of(pair[0]) <= thresholds.bucket_of(pair[1]));
        }
    }
}
