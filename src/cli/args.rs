//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Tri-state checkbox trees: toggle a node, propagate down and up
#[derive(Parser, Debug)]
#[command(name = "checktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Hierarchy description file (default: configured file or built-in sample)
    #[arg(short, long, global = true, env = "CHECKTREE_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree with checkbox glyphs
    Show,

    /// Toggle nodes in order and render the result
    Toggle {
        /// Node paths, e.g. Europe/England/London
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,
        /// List the nodes each toggle changed
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print path and state of every node
    States,

    /// Verify every parent matches its children
    Check,

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
    /// Show global config file location
    Path,
    /// Print a config template
    Template,
}
