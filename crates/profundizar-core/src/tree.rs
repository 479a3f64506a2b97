//! The labeled value tree rendered by the chart.
//!
//! Nodes live in an [`indextree`] arena so that ordered children and parent
//! back-references come for free and node identity is an id, never a
//! structural comparison. The tree is supplied by the host and is read-only
//! to the engine.

use indextree::Arena;

pub use indextree::NodeId;

/// Payload of a single tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Short label shown inside narrow cells.
    pub label_short: String,
    /// Long label shown where space allows.
    pub label_long: String,
    /// Per-node metric values, addressed by the chart's value index.
    pub values: Vec<f64>,
}

impl NodeData {
    /// Create a node payload.
    #[must_use]
    pub fn new(
        label_short: impl Into<String>,
        label_long: impl Into<String>,
        values: impl Into<Vec<f64>>,
    ) -> Self {
        Self {
            label_short: label_short.into(),
            label_long: label_long.into(),
            values: values.into(),
        }
    }

    /// Value at `index`, or 0.0 when the index is out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }
}

/// Arena-backed tree of labeled values with ordered children.
#[derive(Debug, Clone)]
pub struct ValueTree {
    arena: Arena<NodeData>,
    root: NodeId,
}

impl ValueTree {
    /// Create a tree containing only the topmost node.
    #[must_use]
    pub fn new(root: NodeData) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(root);
        Self { arena, root }
    }

    /// The topmost node of the tree.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Append a child under `parent`, preserving insertion order.
    ///
    /// Returns the new node's id. When `parent` is not in this tree the
    /// child is attached to the root instead of failing.
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let child = self.arena.new_node(data);
        let parent = if self.contains(parent) {
            parent
        } else {
            self.root
        };
        parent.append(child, &mut self.arena);
        child
    }

    /// Check whether an id refers to a live node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    /// Payload of a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.arena.get(id).map(indextree::Node::get)
    }

    /// Parent of a node, None for the topmost node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(indextree::Node::parent)
    }

    /// Ordered children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Whether a node has at least one child.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        self.children(id).next().is_some()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Value of a node at `index`; 0.0 for unknown nodes or indices.
    #[must_use]
    pub fn value(&self, id: NodeId, index: usize) -> f64 {
        self.node(id).map_or(0.0, |data| data.value(index))
    }

    /// Short label of a node, empty for unknown nodes.
    #[must_use]
    pub fn label_short(&self, id: NodeId) -> &str {
        self.node(id).map_or("", |data| data.label_short.as_str())
    }

    /// Long label of a node, empty for unknown nodes.
    #[must_use]
    pub fn label_long(&self, id: NodeId) -> &str {
        self.node(id).map_or("", |data| data.label_long.as_str())
    }

    /// Structural depth of the subtree under `id`: 0 for a leaf, else one
    /// more than the deepest child.
    #[must_use]
    pub fn structural_depth(&self, id: NodeId) -> usize {
        self.children(id)
            .map(|child| 1 + self.structural_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.count()
    }

    /// Whether the tree holds only the topmost node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_children(self.root)
    }
}
