//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command opens the store through the same path: pick the engine
//! the configuration names (or the in-process one), attach the
//! append-only diagnostic log, and hand both to the store. Mutating
//! commands nudge the renderer afterwards when one is configured, so a
//! graphical view stays current without the user asking.

use crate::collab::{FileDiagnosticLog, ShellEditor, ShellRenderer, SubprocessEngine};
use crate::config::Config;
use std::path::Path;
use std::time::Duration;
use trailmark_core::{
    Attrs, CommandChain, GraphEngine, GraphStore, InProcessEngine, NavError, Navigator,
};

// =============================================================================
// STORE WIRING
// =============================================================================

fn build_engine(config: &Config) -> Result<Box<dyn GraphEngine>, NavError> {
    match &config.engine {
        Some(argv) => Ok(Box::new(SubprocessEngine::new(
            argv.clone(),
            Duration::from_millis(config.timeout_ms),
        )?)),
        None => Ok(Box::new(InProcessEngine::new())),
    }
}

fn open_store(document: &Path, config: &Config) -> Result<GraphStore, NavError> {
    GraphStore::open(
        document,
        build_engine(config)?,
        Box::new(FileDiagnosticLog::open(&config.log)?),
    )
}

/// Launch the renderer on the document if one is configured. Rendering
/// is best-effort and never fails the command that triggered it.
fn refresh_renderer(config: &Config, store: &GraphStore) {
    if let Some(argv) = &config.renderer {
        ShellRenderer::new(argv.clone()).refresh(store.document_path());
    }
}

/// Parse `key=value` attribute arguments.
fn parse_attrs(pairs: &[String]) -> Result<Attrs, NavError> {
    let mut attrs = Attrs::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(NavError::Parse(format!(
                "attribute {pair:?} is not of the form key=value"
            )));
        };
        if key.is_empty() {
            return Err(NavError::Parse(format!("attribute {pair:?} has no key")));
        }
        attrs.insert(key.to_string(), value.to_string());
    }
    Ok(attrs)
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new bookmark document.
pub fn cmd_init(
    document: &Path,
    config: &Config,
    name: &str,
    force: bool,
) -> Result<(), NavError> {
    if document.exists() && !force {
        return Err(NavError::Io(format!(
            "document {} already exists (use --force to overwrite)",
            document.display()
        )));
    }
    let store = GraphStore::create(
        document,
        name,
        build_engine(config)?,
        Box::new(FileDiagnosticLog::open(&config.log)?),
    )?;
    println!("Initialized {}", store.document_path().display());
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show document status.
pub fn cmd_status(document: &Path, config: &Config, json_mode: bool) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let selected = store.selected()?;
    let nodes = store.list_nodes()?;
    let children = store.children()?;
    let chain = CommandChain::actions(&mut store, &selected)?;

    if json_mode {
        let output = serde_json::json!({
            "document": document.to_string_lossy(),
            "selected": selected,
            "node_count": nodes.len(),
            "children": children,
            "chain_length": chain.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Trailmark Document Status");
    println!("=========================");
    println!("Document: {}", document.display());
    println!();
    println!("Nodes:    {}", nodes.len());
    println!("Selected: {selected}");
    println!("Chain:    {} action(s)", chain.len());
    if children.is_empty() {
        println!("Children: (none)");
    } else {
        println!("Children: {}", children.join(", "));
    }

    Ok(())
}

// =============================================================================
// STRUCTURAL COMMANDS
// =============================================================================

/// Add a bookmark under the current selection and select it.
pub fn cmd_add(
    document: &Path,
    config: &Config,
    label: &str,
    attr_pairs: &[String],
) -> Result<(), NavError> {
    let attrs = parse_attrs(attr_pairs)?;
    let mut store = open_store(document, config)?;
    store.add_node(label, &attrs)?;
    refresh_renderer(config, &store);
    println!("Added and selected {label:?}");
    Ok(())
}

/// Move the selection cursor to a labeled node.
pub fn cmd_select(document: &Path, config: &Config, label: &str) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    store.select(label)?;
    refresh_renderer(config, &store);
    println!("Selected {label:?}");
    Ok(())
}

/// Delete the selected node and its entire subtree.
pub fn cmd_delete(document: &Path, config: &Config) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let target = store.selected()?;
    let reselected = store.delete_subtree()?;
    refresh_renderer(config, &store);
    println!("Deleted subtree at {target:?}; selection moved to {reselected:?}");
    Ok(())
}

// =============================================================================
// NAVIGATION COMMANDS
// =============================================================================

/// Navigation direction for `up` / `down` / `next`.
#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Up,
    Down,
    Next,
}

/// Move the selection one step; staying put is a reported no-op, not an
/// error.
pub fn cmd_navigate(
    document: &Path,
    config: &Config,
    direction: Direction,
) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let moved = match direction {
        Direction::Up => Navigator::ascend(&mut store)?,
        Direction::Down => Navigator::descend(&mut store)?,
        Direction::Next => Navigator::sibling(&mut store)?,
    };
    match moved {
        Some(label) => {
            refresh_renderer(config, &store);
            println!("Selected {label:?}");
        }
        None => println!("Selection unchanged"),
    }
    Ok(())
}

// =============================================================================
// INSPECTION COMMANDS
// =============================================================================

/// List the children of the current selection.
pub fn cmd_children(document: &Path, config: &Config, json_mode: bool) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let children = store.children()?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&children).unwrap_or_default()
        );
        return Ok(());
    }
    if children.is_empty() {
        println!("(no children)");
    } else {
        for child in children {
            println!("{child}");
        }
    }
    Ok(())
}

/// Show the parent of the current selection.
pub fn cmd_parent(document: &Path, config: &Config, json_mode: bool) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let parent = store.parent()?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&parent).unwrap_or_default()
        );
        return Ok(());
    }
    match parent {
        Some(label) => println!("{label}"),
        None => println!("(at root)"),
    }
    Ok(())
}

// =============================================================================
// COMMAND CHAIN COMMANDS
// =============================================================================

/// Append an action to the selected node's command chain.
pub fn cmd_push(document: &Path, config: &Config, action: &str) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let selected = store.selected()?;
    CommandChain::push(&mut store, &selected, action)?;
    println!("Pushed action onto {selected:?}");
    Ok(())
}

/// Capture a file location as a replayable action on the selected node.
pub fn cmd_mark(
    document: &Path,
    config: &Config,
    file: &Path,
    line: u64,
) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let selected = store.selected()?;
    let mut editor = ShellEditor::new(
        config.editor.clone(),
        Some((file.to_path_buf(), line)),
    );
    let action = trailmark_core::Editor::capture_location(&mut editor)?;
    CommandChain::push(&mut store, &selected, &action)?;
    println!("Marked {}:{line} on {selected:?}", file.display());
    Ok(())
}

/// Drop the last action from the selected node's command chain.
pub fn cmd_pop(document: &Path, config: &Config) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let selected = store.selected()?;
    CommandChain::pop(&mut store, &selected)?;
    println!("Popped last action from {selected:?}");
    Ok(())
}

/// Run the selected node's command chain through the editor.
pub fn cmd_exec(document: &Path, config: &Config) -> Result<(), NavError> {
    let mut store = open_store(document, config)?;
    let selected = store.selected()?;
    let mut editor = ShellEditor::new(config.editor.clone(), None);
    CommandChain::execute(&mut store, &selected, &mut editor)?;
    println!("Executed chain of {selected:?}");
    Ok(())
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Launch the configured renderer on the document.
pub fn cmd_render(document: &Path, config: &Config) -> Result<(), NavError> {
    let store = open_store(document, config)?;
    match &config.renderer {
        Some(argv) => {
            ShellRenderer::new(argv.clone()).refresh(store.document_path());
            println!("Renderer launched on {}", document.display());
            Ok(())
        }
        None => {
            println!("No renderer configured");
            Ok(())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_attributes() {
        let attrs = parse_attrs(&["shape=rectangle".to_string(), "note=a=b".to_string()])
            .expect("parse");
        assert_eq!(attrs.get("shape").map(String::as_str), Some("rectangle"));
        // Only the first '=' splits; the value keeps the rest.
        assert_eq!(attrs.get("note").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn attribute_without_equals_rejected() {
        assert!(matches!(
            parse_attrs(&["shape".to_string()]),
            Err(NavError::Parse(_))
        ));
    }

    #[test]
    fn attribute_without_key_rejected() {
        assert!(matches!(
            parse_attrs(&["=oops".to_string()]),
            Err(NavError::Parse(_))
        ));
    }

    #[test]
    fn in_process_engine_selected_without_config() {
        let config = Config::default();
        assert!(build_engine(&config).is_ok());
    }
}
