//! Text renderings of a session: visible tree, node table, JSON report.

use generational_arena::Index;
use serde::Serialize;
use termtree::Tree;

use crate::application::NodeDetails;
use crate::domain::{Bounds, Connector, PositionedNode, TreeArena, VisibilitySet};
use crate::infrastructure::Camera;

/// Visible part of the hierarchy as a `termtree`.
///
/// Collapsed branches are marked `[+]`, expanded ones `[-]`.
pub fn visible_tree(tree: &TreeArena, visibility: &VisibilitySet) -> Tree<String> {
    match tree.root() {
        Some(root) => build_tree(tree, visibility, root),
        None => Tree::new("Empty tree".to_string()),
    }
}

fn build_tree(tree: &TreeArena, visibility: &VisibilitySet, idx: Index) -> Tree<String> {
    let Some(node) = tree.get_node(idx) else {
        return Tree::new(String::new());
    };
    let expanded = visibility.is_expanded(&node.data.id);
    let marker = match (node.is_leaf(), expanded) {
        (true, _) => "",
        (false, true) => " [-]",
        (false, false) => " [+]",
    };
    let mut item = Tree::new(format!("{} ({}){}", node.data.label, node.data.id, marker));
    if expanded {
        for &child in &node.children {
            item.push(build_tree(tree, visibility, child));
        }
    }
    item
}

/// One line per node: id, label, top-left corner, state.
pub fn node_line(node: &PositionedNode) -> String {
    let state = match (node.is_leaf, node.expanded) {
        (true, _) => "leaf",
        (false, true) => "expanded",
        (false, false) => "collapsed",
    };
    format!(
        "{}{:<12} {:<18} x={:>8.1} y={:>8.1}  {}",
        "  ".repeat(node.depth),
        node.id,
        node.label,
        node.x,
        node.y,
        state
    )
}

pub fn connector_line(connector: &Connector) -> String {
    format!(
        "{:<20} {} -> {}",
        connector.id, connector.source_id, connector.target_id
    )
}

/// Machine-readable snapshot of the session.
#[derive(Debug, Serialize)]
pub struct LayoutReport<'a> {
    pub generation: u64,
    pub nodes: &'a [PositionedNode],
    pub connectors: &'a [Connector],
    pub bounds: Option<Bounds>,
    pub camera: &'a Camera,
    pub selected: Option<NodeDetails>,
}
