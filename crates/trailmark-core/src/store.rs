//! # Graph Store
//!
//! Owns the persisted bookmark document and exposes the structural
//! mutation operations on top of the engine boundary. The store enforces
//! the root-protection and single-selection invariants and performs the
//! descendant-reachability computation that scopes subtree deletion.
//!
//! Every mutation follows read -> transform (by the engine) -> atomic
//! replace of the persisted file. A failed invocation leaves the
//! document in its last known-good state; mutations are never partially
//! applied.

use crate::diagnostics::DiagnosticSink;
use crate::document::GraphDocument;
use crate::engine::GraphEngine;
use crate::formats::dot;
use crate::primitives::{
    ATTR_SELECTED, ATTR_STYLE, MAX_SUBTREE_NODES, ROOT_LABEL, STYLE_INVISIBLE, VALUE_TRUE,
};
use crate::program::{MutateProgram, QueryProgram};
use crate::types::{validate_attrs, validate_label, Attrs, NavError};
use std::collections::{BTreeSet, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// GRAPH STORE
// =============================================================================

/// The graph store: document path + engine + diagnostic sink.
///
/// This is the explicit session context passed through every operation;
/// there are no process-wide singletons for the current document or log.
pub struct GraphStore {
    path: PathBuf,
    engine: Box<dyn GraphEngine>,
    diagnostics: Box<dyn DiagnosticSink>,
}

impl GraphStore {
    /// Initialize a fresh document containing only the invisible,
    /// selected root, and persist it. An existing file is overwritten;
    /// the caller decides whether that needs confirmation.
    pub fn create(
        path: impl Into<PathBuf>,
        name: &str,
        engine: Box<dyn GraphEngine>,
        diagnostics: Box<dyn DiagnosticSink>,
    ) -> Result<Self, NavError> {
        let store = Self {
            path: path.into(),
            engine,
            diagnostics,
        };
        let mut doc = GraphDocument::new(name);
        let mut root_attrs = Attrs::new();
        root_attrs.insert(ATTR_SELECTED.to_string(), VALUE_TRUE.to_string());
        root_attrs.insert(ATTR_STYLE.to_string(), STYLE_INVISIBLE.to_string());
        doc.merge_node(ROOT_LABEL, &root_attrs);
        store.replace_document(&dot::serialize(&doc)?)?;
        Ok(store)
    }

    /// Open an existing document. Fails with `NotFound` if the file is
    /// absent and with `InvariantViolation` if the anchor root is gone.
    pub fn open(
        path: impl Into<PathBuf>,
        engine: Box<dyn GraphEngine>,
        diagnostics: Box<dyn DiagnosticSink>,
    ) -> Result<Self, NavError> {
        let path = path.into();
        if !path.exists() {
            return Err(NavError::NotFound(path.display().to_string()));
        }
        let store = Self {
            path,
            engine,
            diagnostics,
        };
        let doc = dot::deserialize(&store.read_document()?)?;
        if !doc.has_root() {
            return Err(NavError::InvariantViolation(
                "document has no anchor root".to_string(),
            ));
        }
        Ok(store)
    }

    /// Path of the persisted document (for the renderer collaborator).
    #[must_use]
    pub fn document_path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // DOCUMENT I/O
    // =========================================================================

    fn read_document(&self) -> Result<String, NavError> {
        std::fs::read_to_string(&self.path).map_err(|e| NavError::io("read document", &e))
    }

    /// Atomically replace the persisted file: write a sibling temp file,
    /// then rename over the target. The engine cannot safely read and
    /// overwrite the same file in one invocation, and a crash mid-write
    /// must never leave a half-written document.
    fn replace_document(&self, text: &str) -> Result<(), NavError> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .map_err(|e| NavError::io("create temp document", &e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| NavError::io("write temp document", &e))?;
        tmp.persist(&self.path)
            .map_err(|e| NavError::io("replace document", &e.error))?;
        Ok(())
    }

    // =========================================================================
    // ENGINE INVOCATION (single diagnostic boundary)
    // =========================================================================

    fn run_query(&mut self, program: &QueryProgram) -> Result<Vec<String>, NavError> {
        let text = program.compile()?;
        let document = self.read_document()?;
        match self.engine.query(&document, program) {
            Ok(lines) => {
                self.diagnostics.record(&text, &lines);
                Ok(lines)
            }
            Err(e) => {
                self.diagnostics.record(&text, &[e.to_string()]);
                Err(e)
            }
        }
    }

    fn run_mutation(&mut self, program: &MutateProgram) -> Result<(), NavError> {
        let text = program.compile()?;
        let document = self.read_document()?;
        match self.engine.mutate(&document, program) {
            Ok(replacement) => {
                let lines: Vec<String> = replacement.lines().map(str::to_string).collect();
                self.diagnostics.record(&text, &lines);
                self.replace_document(&replacement)
            }
            Err(e) => {
                // Document stays untouched; the log is the record.
                self.diagnostics.record(&text, &[e.to_string()]);
                Err(e)
            }
        }
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Label of the unique selected node.
    ///
    /// Zero or multiple selected nodes indicate prior corruption and
    /// abort loudly instead of silently taking the first result.
    pub fn selected(&mut self) -> Result<String, NavError> {
        let mut lines = self.run_query(&QueryProgram::SelectedNodes)?;
        match lines.len() {
            1 => Ok(lines.remove(0)),
            0 => Err(NavError::InvariantViolation(
                "no node carries the selection cursor".to_string(),
            )),
            n => Err(NavError::InvariantViolation(format!(
                "{n} nodes carry the selection cursor"
            ))),
        }
    }

    /// Move the selection cursor to `label`. Fails with `NotFound` for
    /// an unknown label rather than silently doing nothing.
    pub fn select(&mut self, label: &str) -> Result<(), NavError> {
        validate_label(label)?;
        self.run_mutation(&MutateProgram::SelectOnly {
            label: label.to_string(),
        })
    }

    // =========================================================================
    // STRUCTURAL MUTATION
    // =========================================================================

    /// Merge attributes into an existing node. No-op for an empty map.
    pub fn set_attributes(&mut self, label: &str, attrs: &Attrs) -> Result<(), NavError> {
        validate_label(label)?;
        validate_attrs(attrs)?;
        if attrs.is_empty() {
            return Ok(());
        }
        self.run_mutation(&MutateProgram::SetAttributes {
            label: label.to_string(),
            attrs: attrs.clone(),
        })
    }

    /// Create or update a node under the current selection and select
    /// it. Attachment under the root uses an invisible anchor edge. A
    /// node that already has a parent keeps it (attributes still merge);
    /// the whole operation is one atomic document transform.
    pub fn add_node(&mut self, label: &str, attrs: &Attrs) -> Result<(), NavError> {
        validate_label(label)?;
        validate_attrs(attrs)?;
        let parent = self.selected()?;
        let anchor_edge = parent == ROOT_LABEL;
        self.run_mutation(&MutateProgram::AttachNode {
            label: label.to_string(),
            attrs: attrs.clone(),
            parent,
            anchor_edge,
        })
    }

    /// Delete the selected node and every node forward-reachable from
    /// it, together with every edge touching any removed node. Refused
    /// while the root is selected. The deleted node's former parent
    /// becomes the new selection; its label is returned.
    pub fn delete_subtree(&mut self) -> Result<String, NavError> {
        let target = self.selected()?;
        if target == ROOT_LABEL {
            return Err(NavError::RootProtection);
        }
        let reselect = self
            .parent_of(&target)?
            .unwrap_or_else(|| ROOT_LABEL.to_string());
        let labels = self.descendants(&target)?;
        self.run_mutation(&MutateProgram::RemoveSubtree { labels, reselect: reselect.clone() })?;
        Ok(reselect)
    }

    // =========================================================================
    // DERIVED QUERIES
    // =========================================================================

    /// Ordered child labels of the current selection.
    pub fn children(&mut self) -> Result<Vec<String>, NavError> {
        let selected = self.selected()?;
        self.children_of(&selected)
    }

    /// Ordered child labels of `label` (edge insertion order).
    pub fn children_of(&mut self, label: &str) -> Result<Vec<String>, NavError> {
        self.run_query(&QueryProgram::ChildrenOf {
            parent: label.to_string(),
        })
    }

    /// Parent of the current selection, or `None` when the root is
    /// selected (the root's anchor role is not a semantic ancestry).
    pub fn parent(&mut self) -> Result<Option<String>, NavError> {
        let selected = self.selected()?;
        if selected == ROOT_LABEL {
            return Ok(None);
        }
        self.parent_of(&selected)
    }

    /// Single parent of `label`, or `None` for a parentless node.
    /// Multiple incoming edges break the tree shape and abort loudly.
    pub fn parent_of(&mut self, label: &str) -> Result<Option<String>, NavError> {
        let mut lines = self.run_query(&QueryProgram::ParentsOf {
            child: label.to_string(),
        })?;
        match lines.len() {
            0 => Ok(None),
            1 => Ok(Some(lines.remove(0))),
            n => Err(NavError::InvariantViolation(format!(
                "node {label:?} has {n} parents"
            ))),
        }
    }

    /// One attribute value of one node, or `None` when unset.
    pub fn attribute_of(
        &mut self,
        label: &str,
        attribute: &str,
    ) -> Result<Option<String>, NavError> {
        let mut lines = self.run_query(&QueryProgram::AttributeOf {
            node: label.to_string(),
            attribute: attribute.to_string(),
        })?;
        if lines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(lines.remove(0)))
        }
    }

    /// Labels of every node in insertion order (status reporting).
    pub fn list_nodes(&mut self) -> Result<Vec<String>, NavError> {
        self.run_query(&QueryProgram::ListNodes)
    }

    // =========================================================================
    // DESCENDANT COMPUTATION
    // =========================================================================

    /// Forward breadth-first reachability from `start` over outgoing
    /// edges. Marking is idempotent, so the walk terminates even on a
    /// corrupted document containing a cycle.
    fn descendants(&mut self, start: &str) -> Result<BTreeSet<String>, NavError> {
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        visited.insert(start.to_string());
        queue.push_back(start.to_string());

        while let Some(current) = queue.pop_front() {
            if visited.len() > MAX_SUBTREE_NODES {
                return Err(NavError::InvariantViolation(format!(
                    "descendant set exceeds {MAX_SUBTREE_NODES} nodes"
                )));
            }
            for child in self.children_of(&current)? {
                if visited.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
        }
        Ok(visited)
    }
}

// =============================================================================
// TESTS
// =============================================================================
