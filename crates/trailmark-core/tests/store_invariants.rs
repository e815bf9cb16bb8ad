//! # Store Invariant Tests
//!
//! End-to-end checks over the public operations:
//! - Selection uniqueness: exactly one selected node in every state
//! - Root permanence: the root survives every operation sequence
//! - Tree shape: every non-root node has exactly one incoming edge
//! - The interactive scenario walk (init, add, navigate, chain, delete)

use std::path::PathBuf;
use tempfile::TempDir;
use trailmark_core::{
    deserialize, Attrs, CommandChain, Editor, GraphStore, InProcessEngine, MemorySink, NavError,
    Navigator,
};

const ROOT: &str = trailmark_core::primitives::ROOT_LABEL;

fn new_store(dir: &TempDir) -> (GraphStore, PathBuf) {
    let path = dir.path().join("marks.dot");
    let store = GraphStore::create(
        &path,
        "marks",
        Box::new(InProcessEngine::new()),
        Box::new(MemorySink::new()),
    )
    .expect("create store");
    (store, path)
}

fn attrs(pairs: &[(&str, &str)]) -> Attrs {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Parse the persisted file and assert the structural invariants hold.
fn assert_invariants(path: &PathBuf) {
    let text = std::fs::read_to_string(path).expect("read document");
    let doc = deserialize(&text).expect("parse document");

    // Root permanence.
    assert!(doc.has_root(), "root must always exist");

    // Selection uniqueness.
    assert_eq!(
        doc.selected_labels().len(),
        1,
        "exactly one node must be selected"
    );

    // Tree shape: every non-root node has exactly one incoming edge.
    for node in &doc.nodes {
        if node.label == ROOT {
            assert!(doc.parents_of(ROOT).is_empty(), "root has no parent");
        } else {
            assert_eq!(
                doc.parents_of(&node.label).len(),
                1,
                "node {:?} must have exactly one parent",
                node.label
            );
        }
    }
}

// =============================================================================
// SCENARIO WALK
// =============================================================================

#[derive(Default)]
struct RecordingEditor {
    ran: Vec<String>,
}

impl Editor for RecordingEditor {
    fn capture_location(&mut self) -> Result<String, NavError> {
        Ok("edit +12 src/lib.rs".to_string())
    }

    fn run_instruction(&mut self, instruction: &str) -> Result<(), NavError> {
        self.ran.push(instruction.to_string());
        Ok(())
    }
}

#[test]
fn interactive_scenario_walk() {
    let dir = TempDir::new().expect("tempdir");
    let (mut store, path) = new_store(&dir);

    // 1. Fresh document: exactly one node (root), root selected.
    assert_eq!(store.list_nodes().expect("nodes"), vec![ROOT]);
    assert_eq!(store.selected().expect("selected"), ROOT);
    assert_invariants(&path);

    // 2. AddNode under root: invisible anchor edge, attrs applied, A selected.
    store
        .add_node("A", &attrs(&[("shape", "rectangle")]))
        .expect("add A");
    assert_eq!(store.selected().expect("selected"), "A");
    assert_eq!(
        store.attribute_of("A", "shape").expect("attr"),
        Some("rectangle".to_string())
    );
    {
        let text = std::fs::read_to_string(&path).expect("read");
        let doc = deserialize(&text).expect("parse");
        let anchor = &doc.edges[0];
        assert_eq!((anchor.tail.as_str(), anchor.head.as_str()), (ROOT, "A"));
        assert_eq!(anchor.attrs.get("style").map(String::as_str), Some("invis"));
    }
    assert_invariants(&path);

    // 3. AddNode with A selected: visible edge A -> B, B selected.
    store.add_node("B", &Attrs::new()).expect("add B");
    assert_eq!(store.selected().expect("selected"), "B");
    {
        let text = std::fs::read_to_string(&path).expect("read");
        let doc = deserialize(&text).expect("parse");
        let edge = doc.edges.iter().find(|e| e.head == "B").expect("edge");
        assert_eq!(edge.tail, "A");
        assert!(!edge.attrs.contains_key("style"));
    }
    assert_invariants(&path);

    // 4. Ascend: selection becomes A.
    assert_eq!(
        Navigator::ascend(&mut store).expect("ascend"),
        Some("A".to_string())
    );
    assert_invariants(&path);

    // 5. Chain push x2 then execute: the editor receives the joined
    //    two-step instruction in push order.
    let mut editor = RecordingEditor::default();
    CommandChain::push(&mut store, "A", "open file X").expect("push");
    CommandChain::push(&mut store, "A", "goto line 10").expect("push");
    CommandChain::execute(&mut store, "A", &mut editor).expect("execute");
    assert_eq!(editor.ran, vec!["open file X | goto line 10".to_string()]);
    assert_invariants(&path);

    // 6. Delete leaf B: B and its edge removed, A and root remain.
    store.select("B").expect("select B");
    let reselected = store.delete_subtree().expect("delete");
    assert_eq!(reselected, "A");
    {
        let text = std::fs::read_to_string(&path).expect("read");
        let doc = deserialize(&text).expect("parse");
        assert!(!doc.has_node("B"));
        assert!(doc.has_node("A"));
        assert!(doc.edges.iter().all(|e| e.head != "B" && e.tail != "B"));
    }
    assert_invariants(&path);
}

// =============================================================================
// ROOT PERMANENCE
// =============================================================================

#[test]
fn delete_at_root_is_byte_for_byte_noop() {
    let dir = TempDir::new().expect("tempdir");
    let (mut store, path) = new_store(&dir);
    store.add_node("A", &Attrs::new()).expect("add A");
    store.select(ROOT).expect("select root");

    let before = std::fs::read_to_string(&path).expect("read");
    assert_eq!(store.delete_subtree(), Err(NavError::RootProtection));
    let after = std::fs::read_to_string(&path).expect("read");

    assert_eq!(before, after);
    assert_invariants(&path);
}

#[test]
fn root_survives_arbitrary_operation_sequence() {
    let dir = TempDir::new().expect("tempdir");
    let (mut store, path) = new_store(&dir);

    store.add_node("A", &Attrs::new()).expect("add");
    store.add_node("B", &Attrs::new()).expect("add");
    Navigator::ascend(&mut store).expect("ascend");
    store.add_node("C", &Attrs::new()).expect("add");
    Navigator::sibling(&mut store).expect("sibling");
    store.delete_subtree().expect("delete");
    Navigator::descend(&mut store).expect("descend");
    store.delete_subtree().expect("delete");

    assert_invariants(&path);
}

// =============================================================================
// NAVIGATION CLOSURE
// =============================================================================

#[test]
fn ascend_descend_closure_on_first_child() {
    let dir = TempDir::new().expect("tempdir");
    let (mut store, path) = new_store(&dir);

    store.add_node("parent", &Attrs::new()).expect("add");
    store.add_node("first", &Attrs::new()).expect("add");
    store.select("parent").expect("select");
    store.add_node("second", &Attrs::new()).expect("add");

    // "first" is its parent's first child: Ascend then Descend returns.
    store.select("first").expect("select");
    Navigator::ascend(&mut store).expect("ascend");
    Navigator::descend(&mut store).expect("descend");
    assert_eq!(store.selected().expect("selected"), "first");
    assert_invariants(&path);
}

// =============================================================================
// PERSISTENCE ROUND TRIP
// =============================================================================

#[test]
fn reopened_document_equals_persisted_state() {
    let dir = TempDir::new().expect("tempdir");
    let (mut store, path) = new_store(&dir);
    store
        .add_node("notes \"v2\"", &attrs(&[("color", "steelblue")]))
        .expect("add");
    CommandChain::push(&mut store, "notes \"v2\"", "grep TODO | head").expect("push");

    let text = std::fs::read_to_string(&path).expect("read");
    let doc = deserialize(&text).expect("parse");
    let reserialized = trailmark_core::serialize(&doc).expect("serialize");
    assert_eq!(text, reserialized, "serialize/deserialize must round-trip");

    let mut reopened = GraphStore::open(
        &path,
        Box::new(InProcessEngine::new()),
        Box::new(MemorySink::new()),
    )
    .expect("open");
    assert_eq!(reopened.selected().expect("selected"), "notes \"v2\"");
    assert_eq!(
        CommandChain::actions(&mut reopened, "notes \"v2\"").expect("actions"),
        vec!["grep TODO | head".to_string()]
    );
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

#[test]
fn every_invocation_is_recorded() {
    // The sink is owned by the store, so observe through a shared handle.
    use std::cell::RefCell;
    use std::rc::Rc;
    use trailmark_core::DiagnosticSink;

    #[derive(Default)]
    struct SharedSink(Rc<RefCell<Vec<String>>>);

    impl DiagnosticSink for SharedSink {
        fn record(&mut self, program: &str, _output: &[String]) {
            self.0.borrow_mut().push(program.to_string());
        }
    }

    let dir = TempDir::new().expect("tempdir");
    let programs = Rc::new(RefCell::new(Vec::new()));
    let mut store = GraphStore::create(
        dir.path().join("marks.dot"),
        "marks",
        Box::new(InProcessEngine::new()),
        Box::new(SharedSink(Rc::clone(&programs))),
    )
    .expect("create");

    store.add_node("A", &Attrs::new()).expect("add");
    let count_after_add = programs.borrow().len();
    assert!(count_after_add > 0, "mutations must be logged");

    store.children_of(ROOT).expect("children");
    assert!(
        programs.borrow().len() > count_after_add,
        "queries must be logged"
    );
}
