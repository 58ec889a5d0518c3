//! Command dispatch: load settings and tree, drive a session, print results.

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ClickOutcome, NodeDetails, TreeSession};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, ViewArgs};
use crate::cli::output;
use crate::cli::render::{connector_line, node_line, visible_tree, LayoutReport};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, TerminalSurface};

type TerminalSession = TreeSession<TerminalSurface>;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `treeflow --help`".to_string(),
        ));
    };

    // Commands that need no settings
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Path,
        } => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("cannot determine config directory"),
            }
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Layout { view, format } => cmd_layout(&container, view, *format),
        Commands::Tree { view } => cmd_tree(&container, view),
        Commands::Inspect { id, view } => cmd_inspect(&container, id, view),
        Commands::Explore { file } => cmd_explore(&container, file.as_deref()),
        Commands::Validate { file } => cmd_validate(&container, file.as_deref()),
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// FILE argument, else `tree_file` from settings.
fn resolve_file(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.tree_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no tree file given and no tree_file configured".to_string())
        })
}

fn open_session(container: &ServiceContainer, file: Option<&Path>) -> CliResult<TerminalSession> {
    let path = resolve_file(container, file)?;
    let tree = container.load_tree(&path)?;
    let mut session = container.terminal_session(tree)?;
    session.surface_mut().paint();
    Ok(session)
}

/// Open a session and replay the requested clicks, one frame per click.
fn replay(container: &ServiceContainer, view: &ViewArgs) -> CliResult<TerminalSession> {
    let mut session = open_session(container, view.file.as_deref())?;
    for id in &view.clicks {
        apply_click(&mut session, id)?;
    }
    Ok(session)
}

fn apply_click(session: &mut TerminalSession, id: &str) -> CliResult<ClickOutcome> {
    let outcome = session.click(id)?;
    session.surface_mut().paint();
    match outcome {
        ClickOutcome::Ignored => output::warning(&format!("{} is not visible, click ignored", id)),
        ClickOutcome::Expanded => debug!("expanded {}", id),
        ClickOutcome::Collapsed => debug!("collapsed {}", id),
    }
    Ok(outcome)
}

#[instrument(skip(container))]
fn cmd_layout(container: &ServiceContainer, view: &ViewArgs, format: OutputFormat) -> CliResult<()> {
    let session = replay(container, view)?;
    match format {
        OutputFormat::Text => print_layout(&session),
        OutputFormat::Json => {
            let layout = session.layout();
            let report = LayoutReport {
                generation: session.generation(),
                nodes: &layout.nodes,
                connectors: &layout.connectors,
                bounds: layout.bounds(),
                camera: session.surface().camera(),
                selected: session.selected().map(NodeDetails::from),
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Render(e.to_string()))?;
            output::info(&json);
        }
    }
    Ok(())
}

fn print_layout(session: &TerminalSession) {
    let layout = session.layout();
    output::header(&format!(
        "Layout #{}: {} nodes, {} connectors",
        session.generation(),
        layout.nodes.len(),
        layout.connectors.len()
    ));
    for node in &layout.nodes {
        output::detail(&node_line(node));
    }
    if !layout.connectors.is_empty() {
        output::header("Connectors");
        for connector in &layout.connectors {
            output::detail(&connector_line(connector));
        }
    }
    if let Some(bounds) = layout.bounds() {
        output::action(
            "Bounds",
            &format!(
                "({:.1}, {:.1}) - ({:.1}, {:.1})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            ),
        );
    }
    let camera = session.surface().camera();
    output::action(
        "Camera",
        &format!(
            "zoom {:.3}, offset ({:.1}, {:.1})",
            camera.zoom, camera.offset_x, camera.offset_y
        ),
    );
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, view: &ViewArgs) -> CliResult<()> {
    let session = replay(container, view)?;
    output::info(&visible_tree(session.tree(), session.visibility()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_inspect(container: &ServiceContainer, id: &str, view: &ViewArgs) -> CliResult<()> {
    let mut session = replay(container, view)?;
    if !session.select(id) {
        return Err(CliError::InvalidArgs(format!(
            "node {} is not visible (expand its ancestors with --click)",
            id
        )));
    }
    print_panel(&session);
    Ok(())
}

fn print_panel(session: &TerminalSession) {
    match session.selected() {
        Some(node) => {
            let details = NodeDetails::from(node);
            output::header("Node Metadata");
            for (label, value) in details.rows() {
                output::field(label, &value);
            }
            if session.selection().is_stale(session.layout()) {
                output::warning(&format!("{} is currently hidden", details.id));
            }
        }
        None => output::info("no node selected"),
    }
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_file(container, file)?;
    let tree = container.load_tree(&path)?;
    output::success(&format!(
        "{}: {} nodes, depth {}, {} leaves",
        path.display(),
        tree.len(),
        tree.depth(),
        tree.leaf_nodes().len()
    ));
    Ok(())
}

/// Single line event for the explore loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreEvent {
    Click(String),
    Select(String),
    Dismiss,
    Show,
    Panel,
    Quit,
}

impl ExploreEvent {
    /// Parse one input line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }
        let arg = parts.next();
        match (verb, arg) {
            ("click", Some(id)) => Ok(Some(Self::Click(id.to_string()))),
            ("select", Some(id)) => Ok(Some(Self::Select(id.to_string()))),
            ("dismiss", None) => Ok(Some(Self::Dismiss)),
            ("show", None) => Ok(Some(Self::Show)),
            ("panel", None) => Ok(Some(Self::Panel)),
            ("quit" | "exit", None) => Ok(Some(Self::Quit)),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

#[instrument(skip(container))]
fn cmd_explore(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        output::info(&visible_tree(session.tree(), session.visibility()));
        output::prompt("treeflow>");
    }

    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.map_err(|e| InfraError::event_input(number + 1, e))?;
        match ExploreEvent::parse(&line) {
            Ok(Some(ExploreEvent::Quit)) => break,
            Ok(Some(event)) => handle_event(&mut session, event)?,
            Ok(None) => {}
            Err(msg) => output::warning(&msg),
        }
        if interactive {
            output::prompt("treeflow>");
        }
    }
    Ok(())
}

fn handle_event(session: &mut TerminalSession, event: ExploreEvent) -> CliResult<()> {
    match event {
        ExploreEvent::Click(id) => {
            if apply_click(session, &id)? != ClickOutcome::Ignored {
                output::info(&visible_tree(session.tree(), session.visibility()));
                print_panel(session);
            }
        }
        ExploreEvent::Select(id) => {
            if session.select(&id) {
                print_panel(session);
            } else {
                output::warning(&format!("{} is not visible", id));
            }
        }
        ExploreEvent::Dismiss => session.dismiss(),
        ExploreEvent::Show => print_layout(session),
        ExploreEvent::Panel => print_panel(session),
        ExploreEvent::Quit => {}
    }
    Ok(())
}
