//! Service container for dependency injection
//!
//! Wires up services and sessions with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::TreeLoader;
use crate::application::{ApplicationResult, TreeSession};
use crate::config::Settings;
use crate::domain::TreeArena;
use crate::infrastructure::surface::TerminalSurface;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Tree loader honoring the configured depth limit.
    pub fn tree_loader(&self) -> TreeLoader {
        TreeLoader::new(Arc::clone(&self.fs)).with_max_depth(self.settings.layout.max_depth)
    }

    /// Load `path` into a tree.
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeArena> {
        self.tree_loader().load(path)
    }

    /// Start a session on a terminal surface using the configured layout and view.
    pub fn terminal_session(
        &self,
        tree: TreeArena,
    ) -> ApplicationResult<TreeSession<TerminalSurface>> {
        let view = self.settings.view;
        let mut session =
            TreeSession::new(tree, self.settings.layout, TerminalSurface::new(view))?;
        session.set_fit_padding(view.fit_padding);
        Ok(session)
    }
}
