//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Collapsible tree diagram layout: lay out, expand/collapse and inspect hierarchies
#[derive(Parser, Debug)]
#[command(name = "treeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.treeflow.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tree input plus the clicks to replay before output.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Tree file, JSON or TOML (default: tree_file from config)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Click a node (select + expand/collapse); repeatable, applied in order
    #[arg(short = 't', long = "click", value_name = "ID")]
    pub clicks: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print positioned nodes, connectors and camera
    Layout {
        #[command(flatten)]
        view: ViewArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the visible hierarchy as tree
    Tree {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Select a node and show its details
    Inspect {
        /// Node id to select
        id: String,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Read events from stdin: click ID, select ID, dismiss, show, panel, quit
    Explore {
        /// Tree file, JSON or TOML (default: tree_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Load and validate a tree file
    Validate {
        /// Tree file, JSON or TOML (default: tree_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template
    Template,
    /// Show global config file location
    Path,
}
