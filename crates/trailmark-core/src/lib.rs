//! # trailmark-core
//!
//! The deterministic graph store and navigation engine for Trailmark -
//! THE LOGIC.
//!
//! Trailmark maintains a user-authored hierarchy of labeled, attributed
//! bookmark nodes over a body of text: a tree-shaped graph with a
//! protected anchor root, a single selection cursor, and a replayable
//! command chain per node. The surrounding editor, the graphical
//! renderer, and the external query/transform engine are collaborators
//! reached through the traits defined here.
//!
//! ## Architectural Constraints
//!
//! - The persisted document is a single text blob; every mutation is
//!   read -> transform (by the engine) -> atomic file replace
//! - Exactly one node carries the selection cursor at all times
//! - The anchor root always exists and is never removed
//! - No async, no network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod chain;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod formats;
pub mod navigate;
pub mod primitives;
pub mod program;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Attrs, NavError};

// =============================================================================
// RE-EXPORTS: Document & Codec
// =============================================================================

pub use document::{Edge, GraphDocument, Node};
pub use formats::{deserialize, escape_literal, serialize, unescape_literal};

// =============================================================================
// RE-EXPORTS: Engine Boundary
// =============================================================================

pub use engine::{GraphEngine, InProcessEngine};
pub use program::{MutateProgram, QueryProgram};

// =============================================================================
// RE-EXPORTS: Store, Navigation, Chains, Diagnostics
// =============================================================================

pub use chain::{CommandChain, Editor};
pub use diagnostics::{DiagnosticSink, MemorySink};
pub use navigate::Navigator;
pub use store::GraphStore;
