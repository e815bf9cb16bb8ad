//! # Property-Based Tests
//!
//! proptest verification of the codec round-trip law, the literal
//! escaping boundary, the chain encoding, and selection uniqueness
//! across arbitrary operation sequences.

use proptest::collection::vec;
use proptest::prelude::*;
use tempfile::TempDir;
use trailmark_core::{
    deserialize, escape_literal, serialize, unescape_literal, Attrs, CommandChain, GraphDocument,
    GraphStore, InProcessEngine, MemorySink, Navigator,
};

const ROOT: &str = trailmark_core::primitives::ROOT_LABEL;

/// Strategy for strings embeddable in single-line quoted literals:
/// anything but control characters.
fn literal() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[^\\x00-\\x1f\\x7f]{0,40}").expect("regex strategy")
}

/// Non-empty labels.
fn label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[^\\x00-\\x1f\\x7f]{1,24}").expect("regex strategy")
}

proptest! {
    /// escape then unescape is the identity for embeddable strings.
    #[test]
    fn escape_unescape_roundtrip(s in literal()) {
        let escaped = escape_literal(&s).expect("escape");
        prop_assert_eq!(unescape_literal(&escaped).expect("unescape"), s);
    }

    /// Escaped literals never contain a bare quote.
    #[test]
    fn escaped_literal_has_no_bare_quote(s in literal()) {
        let escaped = escape_literal(&s).expect("escape");
        let mut prev_backslash = false;
        for c in escaped.chars() {
            if c == '"' {
                prop_assert!(prev_backslash, "bare quote in escaped literal");
            }
            prev_backslash = c == '\\' && !prev_backslash;
        }
    }

    /// Chain encode/decode is the identity on storable action lists
    /// (empty actions never reach the encoding; push rejects them).
    #[test]
    fn chain_encode_decode_roundtrip(actions in vec(label(), 0..8)) {
        let encoded = trailmark_core::chain::encode(&actions);
        let decoded = trailmark_core::chain::decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, actions);
    }

    /// Codec round trip on documents with arbitrary labels and values.
    #[test]
    fn codec_roundtrip(
        name in literal(),
        labels in vec(label(), 1..8),
        values in vec(literal(), 1..8),
    ) {
        let mut doc = GraphDocument::new(name);
        let mut previous: Option<String> = None;
        for (label, value) in labels.iter().zip(values.iter()) {
            let mut attrs = Attrs::new();
            attrs.insert("tooltip".to_string(), value.clone());
            if doc.merge_node(label, &attrs) {
                if let Some(parent) = previous {
                    doc.push_edge(trailmark_core::Edge::new(parent, label.clone(), Attrs::new()));
                }
                previous = Some(label.clone());
            }
        }

        let text = serialize(&doc).expect("serialize");
        let restored = deserialize(&text).expect("deserialize");
        prop_assert_eq!(doc, restored);
    }

    /// Pop(Push(C, a)) == C for any storable action string.
    #[test]
    fn chain_pop_undoes_push(
        seed in vec(label(), 0..4),
        action in label(),
    ) {
        let dir = TempDir::new().expect("tempdir");
        let mut store = GraphStore::create(
            dir.path().join("marks.dot"),
            "marks",
            Box::new(InProcessEngine::new()),
            Box::new(MemorySink::new()),
        ).expect("create");
        store.add_node("A", &Attrs::new()).expect("add");

        for a in &seed {
            CommandChain::push(&mut store, "A", a).expect("push");
        }
        let before = CommandChain::actions(&mut store, "A").expect("actions");

        CommandChain::push(&mut store, "A", &action).expect("push");
        CommandChain::pop(&mut store, "A").expect("pop");

        let after = CommandChain::actions(&mut store, "A").expect("actions");
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// OPERATION-SEQUENCE PROPERTIES
// =============================================================================

/// One user-facing operation, as generated input.
#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Select(u8),
    Ascend,
    Descend,
    Sibling,
    Delete,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(Op::Add),
        (0u8..12).prop_map(Op::Select),
        Just(Op::Ascend),
        Just(Op::Descend),
        Just(Op::Sibling),
        Just(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// After every operation in an arbitrary sequence, exactly one node
    /// is selected, the root exists, and the document is a tree.
    #[test]
    fn invariants_hold_across_operation_sequences(ops in vec(op(), 1..24)) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("marks.dot");
        let mut store = GraphStore::create(
            &path,
            "marks",
            Box::new(InProcessEngine::new()),
            Box::new(MemorySink::new()),
        ).expect("create");

        for op in &ops {
            // Expected failures (NotFound, RootProtection) are part of
            // normal interaction; invariants must survive them too.
            let _ = match op {
                Op::Add(n) => store.add_node(&format!("n{n}"), &Attrs::new()).map(|()| None),
                Op::Select(n) => store.select(&format!("n{n}")).map(|()| None),
                Op::Ascend => Navigator::ascend(&mut store),
                Op::Descend => Navigator::descend(&mut store),
                Op::Sibling => Navigator::sibling(&mut store),
                Op::Delete => store.delete_subtree().map(Some),
            };

            let text = std::fs::read_to_string(&path).expect("read");
            let doc = deserialize(&text).expect("parse");
            prop_assert!(doc.has_root());
            prop_assert_eq!(doc.selected_labels().len(), 1);
            for node in &doc.nodes {
                if node.label != ROOT {
                    prop_assert_eq!(doc.parents_of(&node.label).len(), 1);
                }
            }
        }
    }
}
