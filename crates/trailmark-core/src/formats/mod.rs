//! # Formats
//!
//! Textual persistence formats for Trailmark documents.
//!
//! The only format is the DOT subset in [`dot`]; the persisted document
//! is a single text blob readable by the external renderer and
//! query/transform collaborators.

pub mod dot;

pub use dot::{deserialize, escape_literal, serialize, unescape_literal};
