//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeflow/treeflow.toml`
//! 3. Local config: `--config <path>`, or `./.treeflow.toml` if present
//! 4. Environment variables: `TREEFLOW__*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::LayoutSpec;
use crate::infrastructure::ViewSettings;

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".treeflow.toml";

/// Unified configuration for treeflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tree file used when a command gets no FILE argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_file: Option<PathBuf>,
    /// Box sizes, gaps, root anchor and depth limits
    pub layout: LayoutSpec,
    /// Viewport and camera fitting
    pub view: ViewSettings,
}

/// Get the XDG config directory for treeflow.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeflow").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeflow.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local` is an explicit config file (must exist); without it
    /// `./.treeflow.toml` is used when present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        let implicit_local = PathBuf::from(LOCAL_CONFIG_FILE);
        let local = match local {
            Some(path) => Some(path),
            None if implicit_local.is_file() => Some(implicit_local.as_path()),
            None => None,
        };
        Self::load_from(global.as_deref(), local, true)
    }

    /// Load from explicit file locations.
    ///
    /// A missing `global` file is skipped; a missing `local` file is an error.
    /// Environment overrides are applied only if `with_env` is set.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        with_env: bool,
    ) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(global_path) = global {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        if let Some(local_path) = local {
            debug!("local config: {}", local_path.display());
            builder = builder.add_source(
                File::from(local_path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("TREEFLOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        settings.layout.validate()?;
        settings.view.validate()?;
        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.tree_file {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::full(raw.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.tree_file = Some(PathBuf::from(expanded));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeflow configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeflow/treeflow.toml
#   Local:  ./.treeflow.toml or --config <path>
#   Env:    TREEFLOW__<SECTION>__<KEY>, e.g. TREEFLOW__LAYOUT__SIBLING_GAP=40

# Tree file used when no FILE argument is given
# tree_file = "~/trees/system.json"

[layout]
# Node box size
# node_width = 160.0
# node_height = 60.0

# Vertical gap between levels, horizontal gap between sibling subtrees
# level_gap = 120.0
# sibling_gap = 30.0

# Root box position: horizontal center and top edge
# anchor_x = 600.0
# anchor_y = 40.0

# Deepest level accepted when loading a tree (root = 0)
# max_depth = 256

# Nodes at this depth or above start expanded (1 = root and its children)
# initial_expand_depth = 1

[view]
# Viewport used to fit the camera
# viewport_width = 1280.0
# viewport_height = 800.0

# Margin around the content, as a fraction of its size
# fit_padding = 0.3

# Zoom limits
# min_zoom = 0.5
# max_zoom = 2.0
"#
        .to_string()
    }
}
