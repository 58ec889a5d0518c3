//! Application layer: services and the interactive session
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod panel;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use panel::{NodeDetails, NodeStatus};
pub use session::{ClickOutcome, TreeSession, DEFAULT_FIT_PADDING};
