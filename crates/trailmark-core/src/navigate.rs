//! # Navigation Engine
//!
//! Cursor movement over the bookmark tree: ascend to the parent, descend
//! to the first child, rotate through siblings. All three are derived
//! from parent/children queries against the store; a movement that has
//! nowhere to go is a no-op, never an error.

use crate::primitives::ROOT_LABEL;
use crate::store::GraphStore;
use crate::types::NavError;

/// Navigation operations over the selection cursor.
///
/// Each operation returns the new selection label, or `None` when the
/// movement was a no-op and the selection did not change.
pub struct Navigator;

impl Navigator {
    /// Move the selection to the current parent. No-op while the root
    /// is selected or the selection is parentless.
    pub fn ascend(store: &mut GraphStore) -> Result<Option<String>, NavError> {
        let selected = store.selected()?;
        if selected == ROOT_LABEL {
            return Ok(None);
        }
        match store.parent_of(&selected)? {
            Some(parent) => {
                store.select(&parent)?;
                Ok(Some(parent))
            }
            None => Ok(None),
        }
    }

    /// Move the selection to the first child in insertion order. No-op
    /// when the selection has no children.
    pub fn descend(store: &mut GraphStore) -> Result<Option<String>, NavError> {
        let selected = store.selected()?;
        let mut children = store.children_of(&selected)?;
        if children.is_empty() {
            return Ok(None);
        }
        let first = children.remove(0);
        store.select(&first)?;
        Ok(Some(first))
    }

    /// Rotate the selection to the next sibling: `(index + 1) mod
    /// child-count` among the parent's children in insertion order.
    /// No-op while the root is selected, the selection is parentless,
    /// or the selection is its parent's only child (wraps to itself).
    pub fn sibling(store: &mut GraphStore) -> Result<Option<String>, NavError> {
        let selected = store.selected()?;
        if selected == ROOT_LABEL {
            return Ok(None);
        }
        let Some(parent) = store.parent_of(&selected)? else {
            return Ok(None);
        };
        let siblings = store.children_of(&parent)?;
        let index = siblings
            .iter()
            .position(|s| *s == selected)
            .ok_or_else(|| {
                NavError::InvariantViolation(format!(
                    "selection {selected:?} missing from its parent's children"
                ))
            })?;
        let next = &siblings[(index + 1) % siblings.len()];
        if *next == selected {
            return Ok(None);
        }
        store.select(next)?;
        Ok(Some(next.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
