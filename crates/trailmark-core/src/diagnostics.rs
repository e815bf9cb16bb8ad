//! # Diagnostics
//!
//! Append-only recording of every engine invocation: the compiled
//! program text and the raw output lines. The CORE defines the sink
//! trait and an in-memory implementation for tests; the application
//! layer provides the file-backed log with its session header.

/// Receives one block per engine invocation.
///
/// Recording is best-effort observability; sinks must not fail the
/// operation they observe.
pub trait DiagnosticSink {
    /// Record a compiled program and the engine's raw output lines.
    /// For mutations the output is the replacement document's lines;
    /// for failed invocations it is the failure rendered as one line.
    fn record(&mut self, program: &str, output: &[String]);
}

/// In-memory sink, used by tests and as a default when no log is wired.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Recorded (program, output) blocks in invocation order.
    pub blocks: Vec<(String, Vec<String>)>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, program: &str, output: &[String]) {
        self.blocks.push((program.to_string(), output.to_vec()));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_preserves_invocation_order() {
        let mut sink = MemorySink::new();
        sink.record("first", &["a".to_string()]);
        sink.record("second", &[]);

        assert_eq!(sink.blocks.len(), 2);
        assert_eq!(sink.blocks[0].0, "first");
        assert_eq!(sink.blocks[1].1, Vec::<String>::new());
    }
}
