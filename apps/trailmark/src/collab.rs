//! # Collaborator Adapters
//!
//! Subprocess-backed implementations of the core's collaborator
//! interfaces: the external pattern-action engine, the append-only
//! diagnostic log, the fire-and-forget renderer, and the editor that
//! interprets composed instruction strings.

use chrono::Utc;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use trailmark_core::{
    DiagnosticSink, GraphEngine, MutateProgram, NavError, QueryProgram,
};

// =============================================================================
// SUBPROCESS ENGINE
// =============================================================================

/// Adapter that hands compiled program text to an external engine.
///
/// The document and the program are written to temp files and the engine
/// is invoked as `argv... -f <program> <document>`; its standard output
/// is the query result or the replacement document. The invocation is
/// bounded: expiry kills the child and counts as a failure, leaving the
/// persisted document unmodified.
pub struct SubprocessEngine {
    argv: Vec<String>,
    timeout: Duration,
}

impl SubprocessEngine {
    /// Create an adapter for the given argv and timeout.
    pub fn new(argv: Vec<String>, timeout: Duration) -> Result<Self, NavError> {
        if argv.is_empty() {
            return Err(NavError::InvocationFailure(
                "empty engine command".to_string(),
            ));
        }
        Ok(Self { argv, timeout })
    }

    fn run(&self, document: &str, program_text: &str) -> Result<String, NavError> {
        let mut doc_file = tempfile::NamedTempFile::new()
            .map_err(|e| NavError::io("create temp document", &e))?;
        doc_file
            .write_all(document.as_bytes())
            .map_err(|e| NavError::io("write temp document", &e))?;

        let mut prog_file = tempfile::NamedTempFile::new()
            .map_err(|e| NavError::io("create temp program", &e))?;
        prog_file
            .write_all(program_text.as_bytes())
            .map_err(|e| NavError::io("write temp program", &e))?;

        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .arg("-f")
            .arg(prog_file.path())
            .arg(doc_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NavError::InvocationFailure(format!("spawn {}: {e}", self.argv[0])))?;

        // Drain both pipes while waiting. A child whose output exceeds
        // the OS pipe buffer blocks on write until someone reads; the
        // wait loop alone would then kill a healthy engine at the
        // deadline.
        let stdout_reader = child.stdout.take().map(drain_pipe);
        let stderr_reader = child.stderr.take().map(drain_pipe);

        let status = wait_bounded(&mut child, self.timeout)?;
        let stdout = stdout_reader
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default();
        if !status.success() {
            let stderr = stderr_reader
                .map(|h| h.join().unwrap_or_default())
                .unwrap_or_default();
            return Err(NavError::InvocationFailure(format!(
                "{} exited with {status}: {}",
                self.argv[0],
                stderr.trim()
            )));
        }
        Ok(stdout)
    }
}

/// Read a child pipe to completion on a background thread. The thread
/// ends when the pipe closes, including after a timeout kill.
fn drain_pipe(mut pipe: impl Read + Send + 'static) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut out = String::new();
        let _ = pipe.read_to_string(&mut out);
        out
    })
}

/// Wait for a child process with a deadline; a timed-out child is killed
/// and reported as an invocation failure.
fn wait_bounded(
    child: &mut Child,
    timeout: Duration,
) -> Result<std::process::ExitStatus, NavError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(NavError::InvocationFailure(format!(
                        "engine timed out after {}ms",
                        timeout.as_millis()
                    )));
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(NavError::io("wait for engine", &e)),
        }
    }
}

impl GraphEngine for SubprocessEngine {
    fn query(&self, document: &str, program: &QueryProgram) -> Result<Vec<String>, NavError> {
        let output = self.run(document, &program.compile()?)?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn mutate(&self, document: &str, program: &MutateProgram) -> Result<String, NavError> {
        let output = self.run(document, &program.compile()?)?;
        // A replacement document that does not parse never reaches the
        // store; a broken external engine cannot corrupt persisted state.
        trailmark_core::deserialize(&output)?;
        Ok(output)
    }
}

// =============================================================================
// DIAGNOSTIC LOG
// =============================================================================

/// Append-only file log: a session-start timestamp line, then one block
/// per engine invocation (the literal program and every output line).
pub struct FileDiagnosticLog {
    file: std::fs::File,
}

impl FileDiagnosticLog {
    /// Open (or create) the log and write the session header.
    pub fn open(path: &Path) -> Result<Self, NavError> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| NavError::io("open diagnostic log", &e))?;
        writeln!(file, "=== session {} ===", Utc::now().to_rfc3339())
            .map_err(|e| NavError::io("write diagnostic log", &e))?;
        Ok(Self { file })
    }
}

impl DiagnosticSink for FileDiagnosticLog {
    fn record(&mut self, program: &str, output: &[String]) {
        // Best-effort: a failing log must not fail the operation.
        let mut block = String::new();
        block.push_str(">>> ");
        block.push_str(program);
        block.push('\n');
        for line in output {
            block.push_str(line);
            block.push('\n');
        }
        block.push('\n');
        if let Err(e) = self.file.write_all(block.as_bytes()) {
            tracing::warn!("diagnostic log write failed: {e}");
        }
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// Fire-and-forget renderer: spawn and forget, no return value consumed.
pub struct ShellRenderer {
    argv: Vec<String>,
}

impl ShellRenderer {
    /// Create a renderer for the given argv.
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// Launch the renderer on the persisted document.
    pub fn refresh(&self, document: &Path) {
        let Some((cmd, rest)) = self.argv.split_first() else {
            tracing::warn!("renderer command is empty");
            return;
        };
        match Command::new(cmd)
            .args(rest)
            .arg(document)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => tracing::debug!("renderer launched on {}", document.display()),
            Err(e) => tracing::warn!("renderer spawn failed: {e}"),
        }
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// Editor collaborator: interprets a composed instruction string by
/// appending it to the configured argv, and captures a location supplied
/// on the command line as a replayable action string.
pub struct ShellEditor {
    argv: Vec<String>,
    location: Option<(PathBuf, u64)>,
}

impl ShellEditor {
    /// Create an editor adapter; `location` backs `capture_location`.
    pub fn new(argv: Vec<String>, location: Option<(PathBuf, u64)>) -> Self {
        Self { argv, location }
    }
}

impl trailmark_core::Editor for ShellEditor {
    fn capture_location(&mut self) -> Result<String, NavError> {
        match &self.location {
            Some((file, line)) => Ok(format!("edit +{line} {}", file.display())),
            None => Err(NavError::InvocationFailure(
                "no location supplied to capture".to_string(),
            )),
        }
    }

    fn run_instruction(&mut self, instruction: &str) -> Result<(), NavError> {
        let Some((cmd, rest)) = self.argv.split_first() else {
            return Err(NavError::InvocationFailure(
                "empty editor command".to_string(),
            ));
        };
        let status = Command::new(cmd)
            .args(rest)
            .arg(instruction)
            .status()
            .map_err(|e| NavError::InvocationFailure(format!("spawn {cmd}: {e}")))?;
        if !status.success() {
            return Err(NavError::InvocationFailure(format!(
                "{cmd} exited with {status}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
