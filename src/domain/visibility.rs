//! Expanded-node tracking.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::arena::TreeArena;

/// Set of node ids whose children are shown.
///
/// Membership of a leaf is allowed and has no effect on layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
    expanded: HashSet<String>,
}

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand every node at depth <= `expand_depth` (root = 0).
    ///
    /// With `expand_depth = 1` the root and its direct children are members.
    #[instrument(level = "debug", skip(tree))]
    pub fn initial(tree: &TreeArena, expand_depth: usize) -> Self {
        let expanded = tree
            .iter()
            .filter(|(_, node)| node.depth <= expand_depth)
            .map(|(_, node)| node.data.id.clone())
            .collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip membership. Returns true if the node is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Member ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.expanded.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for VisibilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().map(Into::into).collect(),
        }
    }
}
