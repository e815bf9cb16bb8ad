//! # Configuration
//!
//! Session configuration for the binary: which external collaborators to
//! invoke and where the diagnostic log lives. Loaded from an optional
//! `trailmark.toml`; every field has a working default so the tool runs
//! with no configuration at all (in-process engine, no renderer).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use trailmark_core::NavError;

/// Default invocation timeout for external collaborators.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// External pattern-action engine argv (e.g. `["gvpr"]`). When
    /// unset, the deterministic in-process engine is used.
    pub engine: Option<Vec<String>>,

    /// Renderer argv; invoked fire-and-forget with the document path
    /// appended. When unset, `render` reports there is nothing to run.
    pub renderer: Option<Vec<String>>,

    /// Editor argv used to interpret composed instruction strings. The
    /// instruction is appended as the final argument.
    pub editor: Vec<String>,

    /// Append-only diagnostic log path.
    pub log: PathBuf,

    /// Bound on external invocations; expiry counts as an invocation
    /// failure and leaves the document unmodified.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: None,
            renderer: None,
            editor: vec!["sh".to_string(), "-c".to_string()],
            log: PathBuf::from("trailmark.log"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, else from
    /// `trailmark.toml` in the working directory if present, else
    /// defaults. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, NavError> {
        let candidate = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(NavError::NotFound(p.display().to_string()));
                }
                p.to_path_buf()
            }
            None => {
                let implicit = PathBuf::from("trailmark.toml");
                if !implicit.exists() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let text = std::fs::read_to_string(&candidate)
            .map_err(|e| NavError::io("read config", &e))?;
        toml::from_str(&text).map_err(|e| NavError::Parse(format!("config: {e}")))
    }
}

// =============================================================================
// TESTS
// =============================================================================
