//! Tree builder: validates input and loads it into a [`TreeArena`].

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{NodeRecord, TreeNode};
use crate::domain::error::{DomainError, DomainResult};

/// Default limit on tree depth (root = depth 0).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Constructs validated arena trees from nested or flat input.
///
/// Walks input with an explicit stack, so arbitrarily deep input cannot
/// overflow the call stack; anything deeper than `max_depth` is rejected.
pub struct TreeBuilder {
    max_depth: usize,
    relationship_cache: HashMap<String, Vec<usize>>,
    visited_ids: HashSet<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            relationship_cache: HashMap::new(),
            visited_ids: HashSet::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build from a nested tree (root with owned children).
    ///
    /// Rejects duplicate ids, empty ids and nodes deeper than `max_depth`.
    #[instrument(level = "debug", skip(self, root), fields(root = %root.id))]
    pub fn build_from_tree(&mut self, root: &TreeNode) -> DomainResult<TreeArena> {
        self.visited_ids.clear();
        let mut tree = TreeArena::new();
        let mut stack: Vec<(&TreeNode, Option<Index>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent_idx, depth)) = stack.pop() {
            self.check_node(&node.id, &node.label, depth)?;

            let current_idx = tree.insert_node(
                NodeData {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    meta: node.meta.clone(),
                },
                parent_idx,
            );

            // Reverse so children are popped, and appended, in input order
            for child in node.children.iter().rev() {
                stack.push((child, Some(current_idx), depth + 1));
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }

    /// Build from flat records linked by parent id.
    ///
    /// Exactly one record may lack a parent. Records that cannot be reached
    /// from that root are part of a parent cycle.
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build_from_records(&mut self, records: &[NodeRecord]) -> DomainResult<TreeArena> {
        self.relationship_cache.clear();
        self.visited_ids.clear();

        let mut known: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in records {
            if record.id.is_empty() {
                return Err(DomainError::EmptyId {
                    label: record.label.clone(),
                });
            }
            if !known.insert(record.id.as_str()) {
                return Err(DomainError::DuplicateId(record.id.clone()));
            }
        }

        let mut roots = Vec::new();
        for (position, record) in records.iter().enumerate() {
            match &record.parent {
                None => roots.push(position),
                Some(parent) if parent == &record.id => {
                    return Err(DomainError::CycleDetected(record.id.clone()));
                }
                Some(parent) if !known.contains(parent.as_str()) => {
                    return Err(DomainError::UnknownParent {
                        child: record.id.clone(),
                        parent: parent.clone(),
                    });
                }
                Some(parent) => self
                    .relationship_cache
                    .entry(parent.clone())
                    .or_default()
                    .push(position),
            }
        }

        let root_position = match roots.as_slice() {
            [single] => *single,
            [] if records.is_empty() => return Err(DomainError::MissingRoot),
            // Every record has a parent, so the parent links must loop
            [] => return Err(DomainError::CycleDetected(records[0].id.clone())),
            many => {
                return Err(DomainError::MultipleRoots(
                    many.iter().map(|&p| records[p].id.clone()).collect(),
                ))
            }
        };

        let mut tree = TreeArena::new();
        let mut stack: Vec<(usize, Option<Index>, usize)> = vec![(root_position, None, 0)];

        while let Some((position, parent_idx, depth)) = stack.pop() {
            let record = &records[position];
            self.check_node(&record.id, &record.label, depth)?;

            let current_idx = tree.insert_node(
                NodeData {
                    id: record.id.clone(),
                    label: record.label.clone(),
                    meta: record.meta.clone(),
                },
                parent_idx,
            );

            if let Some(children) = self.relationship_cache.get(&record.id) {
                for &child in children.iter().rev() {
                    stack.push((child, Some(current_idx), depth + 1));
                }
            }
        }

        if let Some(orphan) = records
            .iter()
            .find(|r| !self.visited_ids.contains(&r.id))
        {
            return Err(DomainError::CycleDetected(orphan.id.clone()));
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }

    fn check_node(&mut self, id: &str, label: &str, depth: usize) -> DomainResult<()> {
        if id.is_empty() {
            return Err(DomainError::EmptyId {
                label: label.to_string(),
            });
        }
        if depth > self.max_depth {
            return Err(DomainError::DepthExceeded {
                id: id.to_string(),
                depth,
                max: self.max_depth,
            });
        }
        if !self.visited_ids.insert(id.to_string()) {
            return Err(DomainError::DuplicateId(id.to_string()));
        }
        Ok(())
    }
}
