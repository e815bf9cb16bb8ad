//! # Engine Boundary
//!
//! The typed interface between the graph store and the query/transform
//! facility. The store's algorithms (traversal, navigation, chain
//! management) depend only on this trait; [`InProcessEngine`] interprets
//! requests deterministically in-process, and the application layer may
//! substitute a subprocess adapter that hands the compiled program text
//! to an external engine.

use crate::document::Edge;
use crate::formats::dot;
use crate::primitives::ROOT_LABEL;
use crate::program::{MutateProgram, QueryProgram};
use crate::types::NavError;

// =============================================================================
// GRAPHENGINE TRAIT
// =============================================================================

/// Executes pattern-action programs against a persisted document text.
///
/// `query` never modifies the document. `mutate` either returns a full
/// replacement document or fails with the document untouched; partial
/// application is not possible at this boundary.
pub trait GraphEngine {
    /// Run a read-only program; returns the ordered output lines.
    fn query(&self, document: &str, program: &QueryProgram) -> Result<Vec<String>, NavError>;

    /// Run a transforming program; returns the replacement document text.
    fn mutate(&self, document: &str, program: &MutateProgram) -> Result<String, NavError>;
}

// =============================================================================
// IN-PROCESS ENGINE
// =============================================================================

/// Deterministic in-process interpreter for pattern-action requests.
///
/// Parses the document with the codec, interprets the typed request
/// directly (no program text round trip), and re-serializes. This is the
/// reference semantics every adapter must match.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessEngine;

impl InProcessEngine {
    /// Create a new in-process engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphEngine for InProcessEngine {
    fn query(&self, document: &str, program: &QueryProgram) -> Result<Vec<String>, NavError> {
        let doc = dot::deserialize(document)?;
        let lines = match program {
            QueryProgram::SelectedNodes => doc
                .selected_labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            QueryProgram::ChildrenOf { parent } => doc
                .children_of(parent)
                .into_iter()
                .map(str::to_string)
                .collect(),
            QueryProgram::ParentsOf { child } => doc
                .parents_of(child)
                .into_iter()
                .map(str::to_string)
                .collect(),
            QueryProgram::AttributeOf { node, attribute } => {
                let node = doc
                    .node(node)
                    .ok_or_else(|| NavError::NotFound(node.clone()))?;
                node.attrs.get(attribute).cloned().into_iter().collect()
            }
            QueryProgram::ListNodes => {
                doc.nodes.iter().map(|n| n.label.clone()).collect()
            }
        };
        Ok(lines)
    }

    fn mutate(&self, document: &str, program: &MutateProgram) -> Result<String, NavError> {
        let mut doc = dot::deserialize(document)?;
        match program {
            MutateProgram::SetAttributes { label, attrs } => {
                if !doc.merge_node_existing(label, attrs) {
                    return Err(NavError::NotFound(label.clone()));
                }
            }
            MutateProgram::AttachNode {
                label,
                attrs,
                parent,
                anchor_edge,
            } => {
                if !doc.has_node(parent) {
                    return Err(NavError::NotFound(parent.clone()));
                }
                doc.merge_node(label, attrs);
                // Single-parent discipline: a node that already has an
                // incoming edge keeps it; no second parent is ever
                // created. Self-edges are likewise never created.
                if doc.parents_of(label).is_empty() && parent != label {
                    let mut edge_attrs = crate::types::Attrs::new();
                    if *anchor_edge {
                        edge_attrs.insert(
                            crate::primitives::ATTR_STYLE.to_string(),
                            crate::primitives::STYLE_INVISIBLE.to_string(),
                        );
                    }
                    doc.push_edge(Edge::new(parent.clone(), label.clone(), edge_attrs));
                }
                broadcast_selection(&mut doc, label)?;
            }
            MutateProgram::SelectOnly { label } => {
                if !doc.has_node(label) {
                    return Err(NavError::NotFound(label.clone()));
                }
                broadcast_selection(&mut doc, label)?;
            }
            MutateProgram::RemoveSubtree { labels, reselect } => {
                if labels.contains(ROOT_LABEL) {
                    return Err(NavError::RootProtection);
                }
                if labels.contains(reselect) {
                    return Err(NavError::InvariantViolation(format!(
                        "reselect target {reselect:?} is inside the removed subtree"
                    )));
                }
                doc.remove_nodes(labels);
                broadcast_selection(&mut doc, reselect)?;
            }
        }
        dot::serialize(&doc)
    }
}

/// Set `selected`/`penwidth` on every node: the target gets the cursor
/// and emphasis, all others are cleared. This is the broadcast update
/// that maintains the single-selection invariant.
fn broadcast_selection(
    doc: &mut crate::document::GraphDocument,
    target: &str,
) -> Result<(), NavError> {
    if !doc.has_node(target) {
        return Err(NavError::NotFound(target.to_string()));
    }
    for node in &mut doc.nodes {
        let on = node.label == target;
        node.attrs.insert(
            crate::primitives::ATTR_SELECTED.to_string(),
            if on {
                crate::primitives::VALUE_TRUE
            } else {
                crate::primitives::VALUE_FALSE
            }
            .to_string(),
        );
        node.attrs.insert(
            crate::primitives::ATTR_PENWIDTH.to_string(),
            if on {
                crate::primitives::PENWIDTH_EMPHASIS
            } else {
                crate::primitives::PENWIDTH_NORMAL
            }
            .to_string(),
        );
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
