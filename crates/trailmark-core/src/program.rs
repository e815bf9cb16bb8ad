//! # Pattern-Action Programs
//!
//! Structured request types for the query/transform engine boundary.
//!
//! A request is built from typed literal fields, never by concatenating
//! raw user text. Compilation to the external engine's program text goes
//! through the codec's escaping in exactly one place, closing the
//! injection risk of string-built programs. Mutations are composed so
//! that each program is a single atomic document transform: a failed
//! invocation leaves every invariant intact.

use crate::formats::dot::escape_literal;
use crate::primitives::{
    ATTR_PENWIDTH, ATTR_SELECTED, ATTR_STYLE, PENWIDTH_EMPHASIS, PENWIDTH_NORMAL, STYLE_INVISIBLE,
    VALUE_FALSE, VALUE_TRUE,
};
use crate::types::{Attrs, NavError};
use std::collections::BTreeSet;

// =============================================================================
// QUERY PROGRAMS
// =============================================================================

/// Read-only requests. The engine answers with an ordered sequence of
/// text lines and never modifies the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryProgram {
    /// Labels of all nodes carrying the selection cursor.
    SelectedNodes,
    /// Ordered child labels of `parent` (edge insertion order).
    ChildrenOf { parent: String },
    /// Parent labels of `child` (at most one under the tree discipline).
    ParentsOf { child: String },
    /// The value of one attribute on one node, or no lines if unset.
    AttributeOf { node: String, attribute: String },
    /// Labels of every node, in insertion order.
    ListNodes,
}

impl QueryProgram {
    /// Compile to the engine's pattern-action program text.
    pub fn compile(&self) -> Result<String, NavError> {
        match self {
            Self::SelectedNodes => Ok(format!(
                "N [aget($, \"{ATTR_SELECTED}\") == \"{VALUE_TRUE}\"] {{ print(name($)); }}"
            )),
            Self::ChildrenOf { parent } => {
                let parent = escape_literal(parent)?;
                Ok(format!(
                    "E [name(tail($)) == \"{parent}\"] {{ print(name(head($))); }}"
                ))
            }
            Self::ParentsOf { child } => {
                let child = escape_literal(child)?;
                Ok(format!(
                    "E [name(head($)) == \"{child}\"] {{ print(name(tail($))); }}"
                ))
            }
            Self::AttributeOf { node, attribute } => {
                let node = escape_literal(node)?;
                let attribute = escape_literal(attribute)?;
                Ok(format!(
                    "N [name($) == \"{node}\" && hasAttr($, \"{attribute}\")] {{ print(aget($, \"{attribute}\")); }}"
                ))
            }
            Self::ListNodes => Ok("N { print(name($)); }".to_string()),
        }
    }
}

// =============================================================================
// MUTATION PROGRAMS
// =============================================================================

/// Document-transforming requests. On success the engine returns a full
/// replacement document; on failure nothing is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutateProgram {
    /// Merge attributes into an existing node, last-write-wins.
    SetAttributes { label: String, attrs: Attrs },
    /// Create-or-merge a node, attach it under `parent` (unless it
    /// already has a parent), and move the selection cursor to it.
    /// `anchor_edge` marks the edge invisible (attachment under root).
    AttachNode {
        label: String,
        attrs: Attrs,
        parent: String,
        anchor_edge: bool,
    },
    /// Broadcast the selection cursor: `label` gets selected + emphasis,
    /// every other node gets deselected + normal emphasis.
    SelectOnly { label: String },
    /// Remove a descendant set and every edge touching it, then select
    /// `reselect`, as one atomic transform.
    RemoveSubtree {
        labels: BTreeSet<String>,
        reselect: String,
    },
}

fn compile_asets(target: &str, attrs: &Attrs) -> Result<String, NavError> {
    let mut out = String::new();
    for (key, value) in attrs {
        let key = escape_literal(key)?;
        let value = escape_literal(value)?;
        out.push_str(&format!("aset({target}, \"{key}\", \"{value}\"); "));
    }
    Ok(out)
}

/// The broadcast select clause shared by every selecting mutation.
fn compile_select_clause(label: &str) -> Result<String, NavError> {
    let label = escape_literal(label)?;
    Ok(format!(
        "N {{ aset($, \"{ATTR_SELECTED}\", name($) == \"{label}\" ? \"{VALUE_TRUE}\" : \"{VALUE_FALSE}\"); \
         aset($, \"{ATTR_PENWIDTH}\", name($) == \"{label}\" ? \"{PENWIDTH_EMPHASIS}\" : \"{PENWIDTH_NORMAL}\"); }}"
    ))
}

impl MutateProgram {
    /// Compile to the engine's pattern-action program text.
    ///
    /// The in-process engine interprets the typed request directly; the
    /// compiled text is what a subprocess adapter hands to the external
    /// engine, and what the diagnostic log records either way.
    pub fn compile(&self) -> Result<String, NavError> {
        match self {
            Self::SetAttributes { label, attrs } => {
                let escaped = escape_literal(label)?;
                let asets = compile_asets("$", attrs)?;
                Ok(format!("N [name($) == \"{escaped}\"] {{ {asets}}}"))
            }
            Self::AttachNode {
                label,
                attrs,
                parent,
                anchor_edge,
            } => {
                let escaped = escape_literal(label)?;
                let parent = escape_literal(parent)?;
                let asets = compile_asets("n", attrs)?;
                let edge_style = if *anchor_edge {
                    format!("aset(e, \"{ATTR_STYLE}\", \"{STYLE_INVISIBLE}\"); ")
                } else {
                    String::new()
                };
                let select = compile_select_clause(label)?;
                Ok(format!(
                    "BEG_G {{ node_t n = node($G, \"{escaped}\"); {asets}\
                     if (indegree(n) == 0 && \"{parent}\" != \"{escaped}\") \
                     {{ edge_t e = edge(node($G, \"{parent}\"), n, \"\"); {edge_style}}} }} {select}"
                ))
            }
            Self::SelectOnly { label } => compile_select_clause(label),
            Self::RemoveSubtree { labels, reselect } => {
                let mut predicate = String::new();
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        predicate.push_str(" || ");
                    }
                    predicate.push_str(&format!("name($) == \"{}\"", escape_literal(label)?));
                }
                let select = compile_select_clause(reselect)?;
                Ok(format!("N [{predicate}] {{ delete($G, $); }} {select}"))
            }
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
    fn query_literals_are_escaped() {
        let program = QueryProgram::ChildrenOf {
            parent: "say \"hi\"".to_string(),
        };
        let text = program.compile().expect("compile");
        assert!(text.contains(r#"say \"hi\""#));
        // The raw quote never reaches the program unescaped.
        assert!(!text.contains("\"say \"hi\"\""));
    }

    #[test]
    fn mutation_literals_are_escaped() {
        let mut attrs = Attrs::new();
        attrs.insert("command".to_string(), r#"open "notes.txt""#.to_string());
        let program = MutateProgram::SetAttributes {
            label: "A".to_string(),
            attrs,
        };
        let text = program.compile().expect("compile");
        assert!(text.contains(r#"open \"notes.txt\""#));
    }

    #[test]
    fn newline_in_literal_fails_compilation() {
        let program = QueryProgram::ParentsOf {
            child: "two\nlines".to_string(),
        };
        assert!(matches!(
            program.compile(),
            Err(NavError::EncodingFailure(_))
        ));
    }

    #[test]
    fn remove_subtree_names_every_label() {
        let labels: BTreeSet<String> =
            ["A".to_string(), "B".to_string()].into_iter().collect();
        let program = MutateProgram::RemoveSubtree {
            labels,
            reselect: "P".to_string(),
        };
        let text = program.compile().expect("compile");
        assert!(text.contains("name($) == \"A\""));
        assert!(text.contains("name($) == \"B\""));
        assert!(text.contains("name($) == \"P\""));
    }

    #[test]
    fn attach_node_marks_anchor_edges_invisible() {
        let program = MutateProgram::AttachNode {
            label: "A".to_string(),
            attrs: Attrs::new(),
            parent: "ROOT".to_string(),
            anchor_edge: true,
        };
        let text = program.compile().expect("compile");
        assert!(text.contains(STYLE_INVISIBLE));
    }
}
