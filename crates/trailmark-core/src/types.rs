//! # Core Type Definitions
//!
//! Error taxonomy and shared aliases for the Trailmark graph store.
//!
//! ## Propagation policy
//!
//! - [`NavError::InvocationFailure`] and [`NavError::EncodingFailure`] are
//!   recovered locally: the persisted document is left in its last
//!   known-good state and the failure is reported to the caller and the
//!   diagnostic log, never raised as a crash.
//! - [`NavError::NotFound`] and [`NavError::RootProtection`] are expected,
//!   recoverable conditions signaled as explicit results.
//! - [`NavError::InvariantViolation`] indicates a programming or
//!   persisted-state defect; the current operation aborts with a loud
//!   diagnostic rather than guessing a selection.

use std::collections::BTreeMap;
use thiserror::Error;

/// Attribute map of a node or edge: name -> string value, last-write-wins
/// per key. `BTreeMap` keeps iteration (and serialization) deterministic.
pub type Attrs = BTreeMap<String, String>;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Trailmark system.
///
/// - No silent failures
/// - Use `Result<T, NavError>` for fallible operations
/// - The CORE never panics; all errors are recoverable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    /// The external engine or renderer exited non-zero or could not be
    /// started. Any in-flight mutation is discarded.
    #[error("engine invocation failed: {0}")]
    InvocationFailure(String),

    /// Selection count != 1, or another structural promise of the
    /// persisted document is broken. Indicates prior corruption.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// An operation referenced a label or document absent from the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempted deletion of the anchor root. Always rejected, never
    /// partially executed.
    #[error("the root node cannot be deleted")]
    RootProtection,

    /// A literal contains characters that cannot be safely escaped for
    /// the persisted textual format or a generated program.
    #[error("cannot encode literal: {0}")]
    EncodingFailure(String),

    /// An empty string was supplied where a node label is required.
    /// Cancelled interactive input yields an empty string; it is a
    /// rejected input, never a valid label.
    #[error("empty label rejected")]
    EmptyLabel,

    /// An empty string was supplied where a chain action is required.
    /// The encoding cannot distinguish a lone empty action from an
    /// empty chain, so an empty action is rejected input.
    #[error("empty action rejected")]
    EmptyAction,

    /// The persisted document text could not be parsed.
    #[error("document parse error: {0}")]
    Parse(String),

    /// An I/O error occurred while reading or replacing the document.
    #[error("I/O error: {0}")]
    Io(String),
}

impl NavError {
    /// Wrap a `std::io::Error` with context.
    pub fn io(context: &str, err: &std::io::Error) -> Self {
        Self::Io(format!("{context}: {err}"))
    }
}

/// Validate a label before it reaches the document or a generated program.
///
/// Rejects empty labels (cancelled input) and labels beyond the size
/// bound. Escaping concerns are handled separately by the codec.
pub fn validate_label(label: &str) -> Result<(), NavError> {
    if label.is_empty() {
        return Err(NavError::EmptyLabel);
    }
    if label.len() > crate::primitives::MAX_LABEL_LENGTH {
        return Err(NavError::EncodingFailure(format!(
            "label length {} exceeds maximum {}",
            label.len(),
            crate::primitives::MAX_LABEL_LENGTH
        )));
    }
    Ok(())
}

/// Validate an attribute map before it reaches the document.
///
/// Oversized values are rejected up front so a runaway input cannot
/// bloat the persisted file or a generated program.
pub fn validate_attrs(attrs: &Attrs) -> Result<(), NavError> {
    for (key, value) in attrs {
        if value.len() > crate::primitives::MAX_VALUE_LENGTH {
            return Err(NavError::EncodingFailure(format!(
                "value for {key:?} exceeds {} bytes",
                crate::primitives::MAX_VALUE_LENGTH
            )));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
