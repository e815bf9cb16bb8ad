//! # Document Codec (DOT subset)
//!
//! Serializes and deserializes the attributed graph document to and from
//! the persisted text blob, and provides the single literal
//! escaping/unescaping boundary used everywhere a user-supplied string is
//! embedded in the format or in a generated pattern-action program.
//!
//! The emitted text is a strict subset of Graphviz DOT so the renderer
//! collaborator can consume the file directly:
//!
//! ```text
//! digraph "name" {
//!   graph [rankdir="LR"];
//!   "ROOT" [selected="true", style="invis"];
//!   "A" [shape="rectangle"];
//!   "ROOT" -> "A" [style="invis"];
//! }
//! ```
//!
//! Round-trip law: `deserialize(serialize(d)) == d` for any document
//! reachable through the public store operations. Escaping applies to
//! every label and attribute value, not just command attributes.

use crate::document::{Edge, GraphDocument, Node};
use crate::types::{Attrs, NavError};

// =============================================================================
// LITERAL ESCAPING
// =============================================================================

/// Render `s` safe for embedding as a quoted literal in the persisted
/// format and in generated programs.
///
/// Backslash and double quote are escaped; newlines, carriage returns and
/// NUL cannot be represented in a single-line quoted literal and yield
/// `EncodingFailure`.
pub fn escape_literal(s: &str) -> Result<String, NavError> {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' | '\r' | '\0' => {
                return Err(NavError::EncodingFailure(format!(
                    "control character {:?} cannot be embedded in a quoted literal",
                    c
                )));
            }
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Inverse of [`escape_literal`].
pub fn unescape_literal(s: &str) -> Result<String, NavError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    return Err(NavError::Parse(format!(
                        "unknown escape sequence \\{other}"
                    )));
                }
                None => {
                    return Err(NavError::Parse(
                        "dangling escape at end of literal".to_string(),
                    ));
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

// =============================================================================
// SERIALIZATION
// =============================================================================

fn write_attrs(out: &mut String, attrs: &Attrs) -> Result<(), NavError> {
    if attrs.is_empty() {
        return Ok(());
    }
    out.push_str(" [");
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        validate_attr_key(key)?;
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_literal(value)?);
        out.push('"');
    }
    out.push(']');
    Ok(())
}

/// Attribute keys are a fixed ASCII identifier vocabulary; anything else
/// would require key-level escaping the format does not define.
fn validate_attr_key(key: &str) -> Result<(), NavError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(NavError::EncodingFailure(format!(
            "attribute key {key:?} is not a plain identifier"
        )));
    }
    Ok(())
}

/// Serialize a document to the persisted text blob.
///
/// This is a pure transformation - no file I/O.
pub fn serialize(doc: &GraphDocument) -> Result<String, NavError> {
    let mut out = String::new();
    out.push_str("digraph \"");
    out.push_str(&escape_literal(&doc.name)?);
    out.push_str("\" {\n");

    if !doc.graph_attrs.is_empty() {
        out.push_str("  graph");
        write_attrs(&mut out, &doc.graph_attrs)?;
        out.push_str(";\n");
    }

    for node in &doc.nodes {
        out.push_str("  \"");
        out.push_str(&escape_literal(&node.label)?);
        out.push('"');
        write_attrs(&mut out, &node.attrs)?;
        out.push_str(";\n");
    }

    for edge in &doc.edges {
        out.push_str("  \"");
        out.push_str(&escape_literal(&edge.tail)?);
        out.push_str("\" -> \"");
        out.push_str(&escape_literal(&edge.head)?);
        out.push('"');
        write_attrs(&mut out, &edge.attrs)?;
        out.push_str(";\n");
    }

    out.push_str("}\n");
    Ok(out)
}

// =============================================================================
// DESERIALIZATION
// =============================================================================

/// A byte-offset cursor over one statement line.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, token: &str) -> bool {
        if let Some(stripped) = self.rest.strip_prefix(token) {
            self.rest = stripped;
            true
        } else {
            false
        }
    }

    fn is_empty(&mut self) -> bool {
        self.skip_ws();
        self.rest.is_empty()
    }

    /// Read a quoted, escaped literal and return its decoded value.
    fn quoted(&mut self) -> Result<String, NavError> {
        self.skip_ws();
        if !self.eat("\"") {
            return Err(NavError::Parse(format!(
                "expected quoted literal at {:?}",
                self.rest
            )));
        }
        let mut raw = String::new();
        let mut chars = self.rest.char_indices();
        let mut escaped = false;
        for (idx, c) in &mut chars {
            if escaped {
                raw.push('\\');
                raw.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                self.rest = &self.rest[idx + 1..];
                return unescape_literal(&raw);
            } else {
                raw.push(c);
            }
        }
        Err(NavError::Parse("unterminated quoted literal".to_string()))
    }

    /// Read a bare identifier (attribute key).
    fn identifier(&mut self) -> Result<String, NavError> {
        self.skip_ws();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '_')
            .map_or(self.rest.len(), |(i, _)| i);
        if end == 0 {
            return Err(NavError::Parse(format!(
                "expected identifier at {:?}",
                self.rest
            )));
        }
        let (ident, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(ident.to_string())
    }

    /// Parse an optional `[key="value", ...]` attribute list.
    fn attr_list(&mut self) -> Result<Attrs, NavError> {
        let mut attrs = Attrs::new();
        self.skip_ws();
        if !self.eat("[") {
            return Ok(attrs);
        }
        loop {
            self.skip_ws();
            if self.eat("]") {
                return Ok(attrs);
            }
            let key = self.identifier()?;
            self.skip_ws();
            if !self.eat("=") {
                return Err(NavError::Parse(format!(
                    "expected '=' after attribute key {key:?}"
                )));
            }
            let value = self.quoted()?;
            attrs.insert(key, value);
            self.skip_ws();
            // Separator is optional before the closing bracket.
            let _ = self.eat(",");
        }
    }
}

/// Deserialize a persisted text blob into a document.
///
/// This is a pure transformation - no file I/O. Only the subset emitted
/// by [`serialize`] is accepted; anything else is a `Parse` error.
pub fn deserialize(text: &str) -> Result<GraphDocument, NavError> {
    let mut lines = text.lines();

    let header = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| NavError::Parse("empty document".to_string()))?;
    let mut cursor = Cursor::new(header.trim());
    if !cursor.eat("digraph") {
        return Err(NavError::Parse("expected 'digraph' header".to_string()));
    }
    let name = cursor.quoted()?;
    cursor.skip_ws();
    if !cursor.eat("{") || !cursor.is_empty() {
        return Err(NavError::Parse("malformed digraph header".to_string()));
    }

    let mut doc = GraphDocument::new(name);
    let mut closed = false;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if closed {
            return Err(NavError::Parse(format!(
                "trailing content after closing brace: {line:?}"
            )));
        }
        if line == "}" {
            closed = true;
            continue;
        }

        let stmt = line.strip_suffix(';').unwrap_or(line);
        let mut cursor = Cursor::new(stmt);

        if cursor.eat("graph") {
            let attrs = cursor.attr_list()?;
            for (k, v) in attrs {
                doc.graph_attrs.insert(k, v);
            }
            continue;
        }

        let first = cursor.quoted()?;
        cursor.skip_ws();
        if cursor.eat("->") {
            let head = cursor.quoted()?;
            let attrs = cursor.attr_list()?;
            if !cursor.is_empty() {
                return Err(NavError::Parse(format!("trailing tokens in {stmt:?}")));
            }
            doc.push_edge(Edge::new(first, head, attrs));
        } else {
            let attrs = cursor.attr_list()?;
            if !cursor.is_empty() {
                return Err(NavError::Parse(format!("trailing tokens in {stmt:?}")));
            }
            if doc.has_node(&first) {
                return Err(NavError::Parse(format!(
                    "duplicate node statement for {first:?}"
                )));
            }
            doc.nodes.push(Node::new(first, attrs));
        }
    }

    if !closed {
        return Err(NavError::Parse("missing closing brace".to_string()));
    }
    Ok(doc)
}

// =============================================================================
// TESTS
// =============================================================================
