//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, RenderSurface)
//! but are themselves concrete structs, not traits.

mod tree_loader;

pub use tree_loader::{TreeDocument, TreeFormat, TreeLoader};
