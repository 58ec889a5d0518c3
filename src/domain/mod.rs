//! Domain layer: tree model, visibility state and layout engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod layout;
pub mod visibility;

pub use arena::{ArenaNode, NodeData, TreeArena};
pub use builder::{TreeBuilder, DEFAULT_MAX_DEPTH};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use layout::{compute_layout, subtree_width, LayoutSpec, SubtreeWidths};
pub use visibility::VisibilitySet;
