use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique identifier across the whole tree
    pub id: String,
    /// Text drawn inside the node box
    pub label: String,
    /// Free-text description shown in the detail panel
    pub meta: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in input order
    pub children: Vec<Index>,
    /// Distance from the root (root = 0)
    pub depth: usize,
}

impl ArenaNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based tree holding one validated hierarchy.
///
/// Built once at load time by [`TreeBuilder`](crate::domain::TreeBuilder);
/// read-only for layout. Ids map to arena indices in O(1).
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    root: Option<Index>,
    ids: HashMap<String, Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            ids: HashMap::new(),
        }
    }

    /// Insert a node under `parent` (appended after existing children).
    ///
    /// Callers guarantee id uniqueness; the builder checks it before inserting.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let id = data.id.clone();
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
            depth,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }
        self.ids.insert(id, node_idx);

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Look up a node index by id.
    pub fn find(&self, id: &str) -> Option<Index> {
        self.ids.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order, left-to-right traversal.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order traversal: every child is yielded before its parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Depth of the deepest node, counted like `max_depth` (root = 0).
    ///
    /// 0 for a lone root and for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.arena
            .iter()
            .map(|(_, node)| node.depth)
            .max()
            .unwrap_or(0)
    }

    /// Ids of all nodes without children, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
