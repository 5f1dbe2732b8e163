//! Command dispatch: the terminal adapter around the tree store.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{load_tree, HierarchySource};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{render, violations, NodeId, TreeArena, TriState, PATH_SEPARATOR};
use crate::exitcode;

/// Run the selected command and return the process exit code.
///
/// Settings are loaded only by commands that read them, so a broken config
/// file does not block `completion` or `config path`.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    match &cli.command {
        Some(Commands::Show) | None => {
            let settings = load_settings(cli)?;
            let tree = load(cli, &settings)?;
            print!("{}", render(&tree, &settings.glyphs)?);
            Ok(exitcode::OK)
        }
        Some(Commands::Toggle { paths, verbose }) => {
            let settings = load_settings(cli)?;
            let mut tree = load(cli, &settings)?;
            for step in apply_toggles(&mut tree, paths)? {
                if *verbose {
                    output::header(&format!("toggle {}", step.path));
                    for (path, state) in &step.changed {
                        output::changed(path, *state);
                    }
                }
            }
            print!("{}", render(&tree, &settings.glyphs)?);
            Ok(exitcode::OK)
        }
        Some(Commands::States) => {
            let tree = load(cli, &load_settings(cli)?)?;
            for (path, state) in states(&tree)? {
                output::info(&format!("{path}\t{state}"));
            }
            Ok(exitcode::OK)
        }
        Some(Commands::Check) => {
            let tree = load(cli, &load_settings(cli)?)?;
            check(&tree)
        }
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn load(cli: &Cli, settings: &Settings) -> CliResult<TreeArena> {
    let source = HierarchySource::resolve(cli.file.as_deref(), settings.hierarchy.as_deref());
    Ok(load_tree(&source)?)
}

/// Outcome of one toggle: the path given and every node it rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleStep {
    pub path: String,
    pub changed: Vec<(String, TriState)>,
}

/// Toggle each path in order, collecting the dirty nodes after every step.
///
/// A blank path is rejected before any node is touched.
#[instrument(level = "debug", skip(tree))]
pub fn apply_toggles(tree: &mut TreeArena, paths: &[String]) -> CliResult<Vec<ToggleStep>> {
    if let Some(position) = paths
        .iter()
        .position(|p| p.trim().trim_matches(PATH_SEPARATOR).trim().is_empty())
    {
        return Err(CliError::InvalidArgs(format!(
            "toggle path #{} is empty",
            position + 1
        )));
    }
    tree.take_dirty();
    let mut steps = Vec::with_capacity(paths.len());
    for path in paths {
        tree.toggle_path(path)?;
        let dirty = tree.take_dirty();
        let changed = describe(tree, &dirty)?;
        steps.push(ToggleStep {
            path: path.clone(),
            changed,
        });
    }
    Ok(steps)
}

fn describe(tree: &TreeArena, nodes: &[NodeId]) -> CliResult<Vec<(String, TriState)>> {
    nodes
        .iter()
        .map(|&idx| -> CliResult<(String, TriState)> {
            Ok((tree.path_of(idx)?, tree.state(idx)?))
        })
        .collect()
}

/// Path and state of every node in pre-order.
pub fn states(tree: &TreeArena) -> CliResult<Vec<(String, TriState)>> {
    let nodes: Vec<NodeId> = tree.iter().map(|(idx, _)| idx).collect();
    describe(tree, &nodes)
}

fn check(tree: &TreeArena) -> CliResult<i32> {
    let broken = violations(tree)?;
    if broken.is_empty() {
        output::success(&format!("{} nodes consistent", tree.len()));
        return Ok(exitcode::OK);
    }
    output::header(&format!("{} inconsistent parents", broken.len()));
    for (path, state) in describe(tree, &broken)? {
        output::failure(&format!("{path}: stored {state}"));
    }
    Ok(exitcode::INCONSISTENT)
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => output::info(&load_settings(cli)?.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::error("cannot determine config directory"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(exitcode::OK)
}
