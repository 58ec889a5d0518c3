//! Domain entities: input tree, layout output, selection

use std::fmt;

use serde::{Deserialize, Serialize};

/// Input tree node, as supplied by the caller.
///
/// Forms a strict tree: ids are unique, children are owned by exactly one parent.
/// `meta` is free text shown in the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node.
    pub fn leaf(id: impl Into<String>, label: impl Into<String>, meta: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            meta: meta.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper to attach children.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Flat input record: one node plus a reference to its parent.
///
/// Exactly one record in a set must have no parent (the root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub parent: Option<String>,
}

/// A visible node with absolute coordinates (top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub meta: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_leaf: bool,
    /// Distance from the root (root = 0)
    pub depth: usize,
    /// Whether the node id is in the visibility set
    pub expanded: bool,
}

impl PositionedNode {
    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for PositionedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ ({}, {})", self.id, self.label, self.x, self.y)
    }
}

/// Line between a visible parent and a visible child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

impl Connector {
    pub fn new(source_id: &str, target_id: &str) -> Self {
        Self {
            id: format!("e-{}-{}", source_id, target_id),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
    }
}

/// Axis-aligned box enclosing all visible nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl From<&PositionedNode> for Bounds {
    fn from(node: &PositionedNode) -> Self {
        Bounds {
            min_x: node.x,
            min_y: node.y,
            max_x: node.x + node.width,
            max_y: node.y + node.height,
        }
    }
}

/// Output of one layout pass: nodes and connectors in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub connectors: Vec<Connector>,
}

impl Layout {
    /// Find a visible node by id.
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Bounds of all visible nodes, `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(Bounds::from)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Detail panel state: at most one selected node.
///
/// Holds a copy of the node as it was positioned when selected, so it keeps
/// showing even after the node is hidden by a collapse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<PositionedNode>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, node: PositionedNode) {
        self.selected = Some(node);
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn get(&self) -> Option<&PositionedNode> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// True if a node is selected but no longer part of `layout`.
    pub fn is_stale(&self, layout: &Layout) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|node| !layout.contains(&node.id))
    }
}
