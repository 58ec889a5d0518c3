//! treeflow: layout engine for collapsible tree diagrams.
//!
//! A tree is loaded once into an arena ([`domain::TreeArena`]), validated on
//! the way in. [`domain::compute_layout`] turns the tree plus the set of
//! expanded node ids into absolute positions for every visible node and the
//! connectors between them. [`application::TreeSession`] owns the expanded
//! set and the selection, recomputes on every click and pushes each new
//! layout to a [`infrastructure::traits::RenderSurface`].
//!
//! ```
//! use treeflow::domain::{compute_layout, LayoutSpec, TreeBuilder, TreeNode, VisibilitySet};
//!
//! let root = TreeNode::leaf("root", "Root", "").with_children(vec![
//!     TreeNode::leaf("A", "A", ""),
//!     TreeNode::leaf("B", "B", ""),
//! ]);
//! let tree = TreeBuilder::new().build_from_tree(&root).unwrap();
//! let visibility: VisibilitySet = ["root"].into_iter().collect();
//! let layout = compute_layout(&tree, &visibility, &LayoutSpec::default()).unwrap();
//! assert_eq!(layout.nodes.len(), 3);
//! assert_eq!(layout.connectors.len(), 2);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
