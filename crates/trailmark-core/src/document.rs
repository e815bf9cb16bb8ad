//! # Graph Document
//!
//! The in-memory representation of the persisted bookmark graph: a set of
//! labeled, attributed nodes and ordered directed edges plus global
//! display attributes.
//!
//! ## Ordering
//!
//! Insertion order is part of the model. Node statements serialize in
//! insertion order; sibling order ("first child", rotation order) is the
//! insertion order of the parent's outgoing edges. Attribute maps are
//! `BTreeMap` so a document serializes identically regardless of the
//! order attributes were written.

use crate::primitives::{ATTR_SELECTED, ROOT_LABEL, VALUE_TRUE};
use crate::types::Attrs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// NODE & EDGE
// =============================================================================

/// A labeled, attributed bookmark node. The label is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub attrs: Attrs,
}

impl Node {
    /// Create a new node with the given label and attributes.
    #[must_use]
    pub fn new(label: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            label: label.into(),
            attrs,
        }
    }

    /// Whether this node currently carries the selection cursor.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.attrs.get(ATTR_SELECTED).map(String::as_str) == Some(VALUE_TRUE)
    }
}

/// A directed parent -> child edge with a display attribute map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub tail: String,
    pub head: String,
    pub attrs: Attrs,
}

impl Edge {
    /// Create a new edge from `tail` to `head`.
    #[must_use]
    pub fn new(tail: impl Into<String>, head: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            tail: tail.into(),
            head: head.into(),
            attrs,
        }
    }
}

// =============================================================================
// GRAPH DOCUMENT
// =============================================================================

/// The whole persisted graph: nodes, edges, and global display attributes.
///
/// Node labels are unique; `merge_node` updates attributes last-write-wins
/// rather than creating a duplicate. Lookup is a linear scan — the data
/// volume is interactive-user sized and whole-document rewrites on every
/// mutation are the accepted cost of the design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub name: String,
    pub graph_attrs: Attrs,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Create an empty document with the given graph name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph_attrs: Attrs::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Lookup a node by label.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Mutable lookup by label.
    pub fn node_mut(&mut self, label: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.label == label)
    }

    /// Whether a node with this label exists.
    #[must_use]
    pub fn has_node(&self, label: &str) -> bool {
        self.node(label).is_some()
    }

    /// Insert a node or merge attributes into an existing one,
    /// last-write-wins per key. Returns whether the node was created.
    pub fn merge_node(&mut self, label: &str, attrs: &Attrs) -> bool {
        if let Some(node) = self.node_mut(label) {
            for (k, v) in attrs {
                node.attrs.insert(k.clone(), v.clone());
            }
            false
        } else {
            self.nodes.push(Node::new(label, attrs.clone()));
            true
        }
    }

    /// Merge attributes into an existing node only. Returns false when
    /// no node with this label exists; nothing is created.
    pub fn merge_node_existing(&mut self, label: &str, attrs: &Attrs) -> bool {
        match self.node_mut(label) {
            Some(node) => {
                for (k, v) in attrs {
                    node.attrs.insert(k.clone(), v.clone());
                }
                true
            }
            None => false,
        }
    }

    /// Append an edge. The caller (engine) is responsible for the
    /// single-parent discipline; the document only records.
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Ordered child labels of `parent` (edge insertion order).
    #[must_use]
    pub fn children_of(&self, parent: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.tail == parent)
            .map(|e| e.head.as_str())
            .collect()
    }

    /// All parents of `child` in edge insertion order.
    ///
    /// Under the tree discipline this has at most one element for
    /// non-root nodes; callers that require uniqueness must check.
    #[must_use]
    pub fn parents_of(&self, child: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.head == child)
            .map(|e| e.tail.as_str())
            .collect()
    }

    /// Labels of all currently selected nodes, in insertion order.
    #[must_use]
    pub fn selected_labels(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.is_selected())
            .map(|n| n.label.as_str())
            .collect()
    }

    /// Remove the given nodes together with every edge touching any of
    /// them. Labels absent from the document are ignored (idempotent).
    pub fn remove_nodes(&mut self, labels: &BTreeSet<String>) {
        self.nodes.retain(|n| !labels.contains(&n.label));
        self.edges
            .retain(|e| !labels.contains(&e.tail) && !labels.contains(&e.head));
    }

    /// Whether the anchor root node is present.
    #[must_use]
    pub fn has_root(&self) -> bool {
        self.has_node(ROOT_LABEL)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn merge_node_is_last_write_wins() {
        let mut doc = GraphDocument::new("g");
        assert!(doc.merge_node("A", &attrs(&[("shape", "rectangle")])));
        assert!(!doc.merge_node("A", &attrs(&[("shape", "oval"), ("color", "red")])));

        let node = doc.node("A").expect("node");
        assert_eq!(node.attrs.get("shape").map(String::as_str), Some("oval"));
        assert_eq!(node.attrs.get("color").map(String::as_str), Some("red"));
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn children_preserve_edge_insertion_order() {
        let mut doc = GraphDocument::new("g");
        doc.merge_node("P", &Attrs::new());
        doc.merge_node("C", &Attrs::new());
        doc.merge_node("B", &Attrs::new());
        doc.push_edge(Edge::new("P", "C", Attrs::new()));
        doc.push_edge(Edge::new("P", "B", Attrs::new()));

        // Not sorted: order of attachment, not of label.
        assert_eq!(doc.children_of("P"), vec!["C", "B"]);
    }

    #[test]
    fn remove_nodes_drops_touching_edges() {
        let mut doc = GraphDocument::new("g");
        doc.merge_node("A", &Attrs::new());
        doc.merge_node("B", &Attrs::new());
        doc.merge_node("C", &Attrs::new());
        doc.push_edge(Edge::new("A", "B", Attrs::new()));
        doc.push_edge(Edge::new("B", "C", Attrs::new()));

        let removed: BTreeSet<String> = ["B".to_string()].into_iter().collect();
        doc.remove_nodes(&removed);

        assert!(!doc.has_node("B"));
        assert!(doc.edges.is_empty());
        assert!(doc.has_node("A"));
        assert!(doc.has_node("C"));
    }

    #[test]
    fn selected_labels_reflect_attribute() {
        let mut doc = GraphDocument::new("g");
        doc.merge_node("A", &attrs(&[(ATTR_SELECTED, VALUE_TRUE)]));
        doc.merge_node("B", &attrs(&[(ATTR_SELECTED, "false")]));

        assert_eq!(doc.selected_labels(), vec!["A"]);
    }
}
