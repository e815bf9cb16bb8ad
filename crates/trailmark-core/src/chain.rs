//! # Command Chain Manager
//!
//! The ordered list of replayable action strings attached to a node,
//! stored as one delimiter-joined `command` attribute value. Each action
//! segment is escaped before joining (and unescaped after splitting) so
//! a literal delimiter or backslash inside an action survives storage.
//!
//! The CORE only stores and composes actions; interpreting them is the
//! editor collaborator's business.

use crate::primitives::{ACTION_SEPARATOR, ATTR_COMMAND, CHAIN_DELIMITER, CHAIN_ESCAPE};
use crate::store::GraphStore;
use crate::types::{Attrs, NavError};

// =============================================================================
// EDITOR COLLABORATOR
// =============================================================================

/// The consumed editor interface.
///
/// `capture_location` produces a replayable action string for the
/// current file/cursor position; `run_instruction` interprets a literal
/// instruction string. The CORE never parses editor semantics.
pub trait Editor {
    /// Capture the current location as a replayable action string.
    fn capture_location(&mut self) -> Result<String, NavError>;

    /// Interpret and run a literal instruction string.
    fn run_instruction(&mut self, instruction: &str) -> Result<(), NavError>;
}

// =============================================================================
// CHAIN ENCODING
// =============================================================================

/// Decode a stored chain attribute into its action segments.
///
/// An empty value is an empty chain. Splitting honors the escape
/// character, so escaped delimiters stay inside their segment.
pub fn decode(raw: &str) -> Result<Vec<String>, NavError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == CHAIN_ESCAPE {
            match chars.next() {
                Some(escaped) if escaped == CHAIN_DELIMITER || escaped == CHAIN_ESCAPE => {
                    current.push(escaped);
                }
                Some(other) => {
                    return Err(NavError::Parse(format!(
                        "unknown chain escape {CHAIN_ESCAPE}{other}"
                    )));
                }
                None => {
                    return Err(NavError::Parse(
                        "dangling escape at end of command chain".to_string(),
                    ));
                }
            }
        } else if c == CHAIN_DELIMITER {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    Ok(segments)
}

/// Encode action segments into the stored attribute value, escaping the
/// delimiter and the escape character inside every segment.
#[must_use]
pub fn encode(actions: &[String]) -> String {
    let escaped: Vec<String> = actions
        .iter()
        .map(|action| {
            let mut out = String::with_capacity(action.len());
            for c in action.chars() {
                if c == CHAIN_DELIMITER || c == CHAIN_ESCAPE {
                    out.push(CHAIN_ESCAPE);
                }
                out.push(c);
            }
            out
        })
        .collect();
    escaped.join(&CHAIN_DELIMITER.to_string())
}

// =============================================================================
// CHAIN OPERATIONS
// =============================================================================

/// Chain operations on top of the graph store.
pub struct CommandChain;

impl CommandChain {
    /// The decoded action list stored on `label` (empty if unset).
    pub fn actions(store: &mut GraphStore, label: &str) -> Result<Vec<String>, NavError> {
        match store.attribute_of(label, ATTR_COMMAND)? {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Append an action to the node's chain. Empty actions are rejected
    /// input: a lone empty action encodes identically to an empty chain
    /// and would vanish on the next decode.
    pub fn push(store: &mut GraphStore, label: &str, action: &str) -> Result<(), NavError> {
        if action.is_empty() {
            return Err(NavError::EmptyAction);
        }
        let mut actions = Self::actions(store, label)?;
        actions.push(action.to_string());
        Self::write(store, label, &actions)
    }

    /// Drop the last action from the node's chain. Popping an empty
    /// chain yields an empty chain, not an error.
    pub fn pop(store: &mut GraphStore, label: &str) -> Result<(), NavError> {
        let mut actions = Self::actions(store, label)?;
        if actions.pop().is_none() {
            return Ok(());
        }
        Self::write(store, label, &actions)
    }

    /// Compose the node's chain into a single instruction string (the
    /// editor's own action-separator convention, push order preserved)
    /// and hand it to the editor for literal interpretation. An empty
    /// chain runs nothing.
    pub fn execute(
        store: &mut GraphStore,
        label: &str,
        editor: &mut dyn Editor,
    ) -> Result<(), NavError> {
        let actions = Self::actions(store, label)?;
        if actions.is_empty() {
            return Ok(());
        }
        editor.run_instruction(&actions.join(ACTION_SEPARATOR))
    }

    fn write(store: &mut GraphStore, label: &str, actions: &[String]) -> Result<(), NavError> {
        let mut attrs = Attrs::new();
        attrs.insert(ATTR_COMMAND.to_string(), encode(actions));
        store.set_attributes(label, &attrs)
    }
}

// =============================================================================
// TESTS
// =============================================================================
