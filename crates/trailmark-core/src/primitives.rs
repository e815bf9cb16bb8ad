//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Trailmark CORE.
//!
//! Trailmark starts with an empty graph but fixed conventions: the anchor
//! root label, the reserved attribute vocabulary, and the delimiters used
//! by the command-chain encoding. These are compiled into the binary and
//! immutable at runtime.

/// Label of the anchor root node.
///
/// The root always exists, is always styled invisible, is never deletable,
/// and serves as the default parent for nodes added while nothing
/// meaningful is selected. It is a layout anchor, not a semantic ancestor.
pub const ROOT_LABEL: &str = "ROOT";

// =============================================================================
// RESERVED ATTRIBUTE VOCABULARY
// =============================================================================

/// Selection-cursor attribute. Exactly one node carries `selected = "true"`.
pub const ATTR_SELECTED: &str = "selected";

/// Command-chain attribute: the delimiter-joined action list.
pub const ATTR_COMMAND: &str = "command";

/// Display style attribute (used for the invisible anchor edges and root).
pub const ATTR_STYLE: &str = "style";

/// Visual emphasis attribute for the selected node.
pub const ATTR_PENWIDTH: &str = "penwidth";

/// Style value marking the root node and its anchor edges invisible.
pub const STYLE_INVISIBLE: &str = "invis";

/// Boolean attribute values as stored in the document.
pub const VALUE_TRUE: &str = "true";
pub const VALUE_FALSE: &str = "false";

/// Pen width applied to the selected node.
pub const PENWIDTH_EMPHASIS: &str = "3";

/// Pen width applied to every unselected node.
pub const PENWIDTH_NORMAL: &str = "1";

// =============================================================================
// COMMAND-CHAIN ENCODING
// =============================================================================

/// Delimiter between actions inside the stored `command` attribute.
///
/// Action segments are escaped before joining so a literal delimiter (or
/// backslash) inside an action survives a decode round trip.
pub const CHAIN_DELIMITER: char = '|';

/// Escape character for the chain encoding and for quoted literals.
pub const CHAIN_ESCAPE: char = '\\';

/// Separator used when composing a chain into a single editor
/// instruction. This is the editor collaborator's own action-joining
/// convention; the CORE only produces the string.
pub const ACTION_SEPARATOR: &str = " | ";

// =============================================================================
// COMPUTATIONAL BOUNDS
// =============================================================================

/// Upper bound on the descendant working set during subtree deletion.
///
/// All traversals must be computationally bounded. A tree-authored
/// document never comes close; hitting the bound indicates corruption.
pub const MAX_SUBTREE_NODES: usize = 10_000;

/// Maximum length for node labels.
///
/// Labels longer than this are rejected before they reach the document.
pub const MAX_LABEL_LENGTH: usize = 256;

/// Maximum length for attribute values (64KB).
pub const MAX_VALUE_LENGTH: usize = 65_536;
