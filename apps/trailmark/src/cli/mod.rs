//! # Trailmark CLI Module
//!
//! This module implements the CLI interface for Trailmark.
//!
//! ## Available Commands
//!
//! - `init` - Initialize a new bookmark document
//! - `status` - Show document status
//! - `add` - Add a bookmark under the current selection
//! - `select` - Move the selection cursor to a labeled node
//! - `up` / `down` / `next` - Navigate the tree
//! - `delete` - Delete the selected subtree
//! - `children` / `parent` - Inspect the neighborhood of the selection
//! - `push` / `pop` / `mark` / `exec` - Manage the command chain
//! - `render` - Launch the configured renderer on the document

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailmark_core::NavError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trailmark - navigation bookmark graphs for text
///
/// A tree of labeled bookmarks over a body of text, with a single
/// selection cursor and a replayable command chain per node.
#[derive(Parser, Debug)]
#[command(name = "trailmark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the bookmark document
    #[arg(short = 'D', long, global = true, default_value = "trailmark.dot")]
    pub document: PathBuf,

    /// Path to the configuration file (default: ./trailmark.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new bookmark document
    Init {
        /// Graph name recorded in the document
        #[arg(short, long, default_value = "trailmark")]
        name: String,

        /// Overwrite an existing document
        #[arg(short, long)]
        force: bool,
    },

    /// Show document status
    Status,

    /// Add a bookmark under the current selection and select it
    Add {
        /// Node label
        label: String,

        /// Attributes as key=value pairs
        #[arg(short, long, value_name = "KEY=VALUE")]
        attr: Vec<String>,
    },

    /// Move the selection cursor to a labeled node
    Select {
        /// Node label
        label: String,
    },

    /// Move the selection to the parent of the current node
    Up,

    /// Move the selection to the first child of the current node
    Down,

    /// Rotate the selection to the next sibling
    Next,

    /// Delete the selected node and its entire subtree
    Delete,

    /// List the children of the current selection
    Children,

    /// Show the parent of the current selection
    Parent,

    /// Append an action to the selected node's command chain
    Push {
        /// Literal action string
        action: String,
    },

    /// Capture a file location as an action on the selected node
    Mark {
        /// File the bookmark points into
        #[arg(short, long)]
        file: PathBuf,

        /// Line number within the file
        #[arg(short, long, default_value = "1")]
        line: u64,
    },

    /// Drop the last action from the selected node's command chain
    Pop,

    /// Run the selected node's command chain through the editor
    Exec,

    /// Launch the configured renderer on the document
    Render,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), NavError> {
    let config = crate::config::Config::load(cli.config.as_deref())?;
    let document = cli.document;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { name, force }) => cmd_init(&document, &config, &name, force),
        Some(Commands::Status) | None => cmd_status(&document, &config, json_mode),
        Some(Commands::Add { label, attr }) => cmd_add(&document, &config, &label, &attr),
        Some(Commands::Select { label }) => cmd_select(&document, &config, &label),
        Some(Commands::Up) => cmd_navigate(&document, &config, Direction::Up),
        Some(Commands::Down) => cmd_navigate(&document, &config, Direction::Down),
        Some(Commands::Next) => cmd_navigate(&document, &config, Direction::Next),
        Some(Commands::Delete) => cmd_delete(&document, &config),
        Some(Commands::Children) => cmd_children(&document, &config, json_mode),
        Some(Commands::Parent) => cmd_parent(&document, &config, json_mode),
        Some(Commands::Push { action }) => cmd_push(&document, &config, &action),
        Some(Commands::Mark { file, line }) => cmd_mark(&document, &config, &file, line),
        Some(Commands::Pop) => cmd_pop(&document, &config),
        Some(Commands::Exec) => cmd_exec(&document, &config),
        Some(Commands::Render) => cmd_render(&document, &config),
    }
}
