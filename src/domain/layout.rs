//! Layout engine: subtree widths (bottom-up) and node placement (top-down).
//!
//! Every node occupies a box of `node_width x node_height`. An expanded node
//! reserves a horizontal span wide enough for all of its visible descendants
//! plus `sibling_gap` between neighbouring subtrees, and sits centered over
//! that span. Collapsed nodes and leaves reserve exactly `node_width`.

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::builder::DEFAULT_MAX_DEPTH;
use crate::domain::entities::{Connector, Layout, PositionedNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::visibility::VisibilitySet;

pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 60.0;
pub const LEVEL_GAP: f64 = 120.0;
pub const SIBLING_GAP: f64 = 30.0;
pub const ANCHOR_X: f64 = 600.0;
pub const ANCHOR_Y: f64 = 40.0;

/// Geometry parameters for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    pub node_width: f64,
    pub node_height: f64,
    /// Vertical space between the bottom of a parent and the top of its children
    pub level_gap: f64,
    /// Horizontal space between neighbouring sibling subtrees
    pub sibling_gap: f64,
    /// Horizontal center of the root box
    pub anchor_x: f64,
    /// Top edge of the root box
    pub anchor_y: f64,
    pub max_depth: usize,
    /// Nodes at this depth or above start expanded
    pub initial_expand_depth: usize,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            level_gap: LEVEL_GAP,
            sibling_gap: SIBLING_GAP,
            anchor_x: ANCHOR_X,
            anchor_y: ANCHOR_Y,
            max_depth: DEFAULT_MAX_DEPTH,
            initial_expand_depth: 1,
        }
    }
}

impl LayoutSpec {
    /// Reject non-finite values, non-positive box sizes and negative gaps.
    pub fn validate(&self) -> DomainResult<()> {
        let positive = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::InvalidSpacing { field, value });
            }
        }
        let non_negative = [
            ("level_gap", self.level_gap),
            ("sibling_gap", self.sibling_gap),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidSpacing { field, value });
            }
        }
        let anchors = [("anchor_x", self.anchor_x), ("anchor_y", self.anchor_y)];
        for (field, value) in anchors {
            if !value.is_finite() {
                return Err(DomainError::InvalidSpacing { field, value });
            }
        }
        Ok(())
    }

    /// Vertical distance between the tops of two consecutive levels.
    pub fn level_step(&self) -> f64 {
        self.node_height + self.level_gap
    }
}

/// Span reserved by `idx`, computed recursively without memoization.
///
/// Reference definition of subtree width; [`SubtreeWidths`] computes the same
/// values for the whole tree in one pass.
pub fn subtree_width(
    tree: &TreeArena,
    idx: Index,
    visibility: &VisibilitySet,
    spec: &LayoutSpec,
) -> f64 {
    let Some(node) = tree.get_node(idx) else {
        return spec.node_width;
    };
    if !visibility.is_expanded(&node.data.id) || node.is_leaf() {
        return spec.node_width;
    }
    let children: f64 = node
        .children
        .iter()
        .map(|&child| subtree_width(tree, child, visibility, spec))
        .sum();
    let gaps = (node.children.len() - 1) as f64 * spec.sibling_gap;
    spec.node_width.max(children + gaps)
}

/// Memoized subtree widths for every node of a tree.
#[derive(Debug, Clone, Default)]
pub struct SubtreeWidths {
    widths: HashMap<Index, f64>,
}

impl SubtreeWidths {
    /// Single post-order sweep: children are measured before their parents.
    ///
    /// Hidden subtrees are measured too; they are simply never consulted.
    #[instrument(level = "debug", skip_all)]
    pub fn compute(tree: &TreeArena, visibility: &VisibilitySet, spec: &LayoutSpec) -> Self {
        let mut widths = HashMap::with_capacity(tree.len());
        for (idx, node) in tree.iter_postorder() {
            let width = if !visibility.is_expanded(&node.data.id) || node.is_leaf() {
                spec.node_width
            } else {
                let children: f64 = node
                    .children
                    .iter()
                    .map(|child| widths.get(child).copied().unwrap_or(spec.node_width))
                    .sum();
                let gaps = (node.children.len() - 1) as f64 * spec.sibling_gap;
                spec.node_width.max(children + gaps)
            };
            widths.insert(idx, width);
        }
        Self { widths }
    }

    /// Width of `idx`; unknown indices count as a single box.
    pub fn get(&self, idx: Index, spec: &LayoutSpec) -> f64 {
        self.widths.get(&idx).copied().unwrap_or(spec.node_width)
    }
}

/// Compute positions for every visible node and connector.
///
/// The root is placed at the anchor; a node's children are laid out only if
/// the node is in `visibility`. Output order is pre-order, left to right.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len(), expanded = visibility.len()))]
pub fn compute_layout(
    tree: &TreeArena,
    visibility: &VisibilitySet,
    spec: &LayoutSpec,
) -> DomainResult<Layout> {
    spec.validate()?;
    let Some(root) = tree.root() else {
        return Err(DomainError::MissingRoot);
    };

    let widths = SubtreeWidths::compute(tree, visibility, spec);
    let mut placer = Placer {
        tree,
        visibility,
        spec,
        widths: &widths,
        layout: Layout::default(),
    };
    placer.place(root, spec.anchor_x, spec.anchor_y, None, 0)?;

    debug!(
        "layout: {} nodes, {} connectors",
        placer.layout.nodes.len(),
        placer.layout.connectors.len()
    );
    Ok(placer.layout)
}

struct Placer<'a> {
    tree: &'a TreeArena,
    visibility: &'a VisibilitySet,
    spec: &'a LayoutSpec,
    widths: &'a SubtreeWidths,
    layout: Layout,
}

impl Placer<'_> {
    fn place(
        &mut self,
        idx: Index,
        center_x: f64,
        y: f64,
        parent_id: Option<&str>,
        depth: usize,
    ) -> DomainResult<()> {
        let tree = self.tree;
        let spec = self.spec;
        let node = tree
            .get_node(idx)
            .ok_or_else(|| DomainError::UnknownNode(format!("{:?}", idx)))?;
        let id = node.data.id.as_str();
        if depth > spec.max_depth {
            return Err(DomainError::DepthExceeded {
                id: id.to_string(),
                depth,
                max: spec.max_depth,
            });
        }

        let expanded = self.visibility.is_expanded(id);
        self.layout.nodes.push(PositionedNode {
            id: id.to_string(),
            label: node.data.label.clone(),
            meta: node.data.meta.clone(),
            x: center_x - spec.node_width / 2.0,
            y,
            width: spec.node_width,
            height: spec.node_height,
            is_leaf: node.is_leaf(),
            depth,
            expanded,
        });

        if let Some(parent_id) = parent_id {
            self.layout.connectors.push(Connector::new(parent_id, id));
        }

        if !expanded || node.is_leaf() {
            return Ok(());
        }

        let total_width = self.widths.get(idx, spec);
        let mut cursor = center_x - total_width / 2.0;
        let child_y = y + spec.level_step();
        for &child in &node.children {
            let child_width = self.widths.get(child, spec);
            self.place(child, cursor + child_width / 2.0, child_y, Some(id), depth + 1)?;
            cursor += child_width + spec.sibling_gap;
        }
        Ok(())
    }
}
