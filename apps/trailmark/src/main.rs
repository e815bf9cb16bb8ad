//! # Trailmark - Navigation Bookmark Graphs
//!
//! The main binary for the Trailmark bookmark tree.
//!
//! This application provides:
//! - CLI interface for bookmark operations (clap-based)
//! - Collaborator adapters (external engine, renderer, editor, log)
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                apps/trailmark (THE BINARY)                 │
//! │                                                            │
//! │  ┌───────────┐   ┌────────────────────────────────────┐   │
//! │  │   CLI     │   │      Collaborator Adapters         │   │
//! │  │  (clap)   │   │  (engine / renderer / editor /     │   │
//! │  │           │   │   diagnostic log subprocesses)     │   │
//! │  └─────┬─────┘   └──────────────┬─────────────────────┘   │
//! │        │                        │                          │
//! │        └────────────┬───────────┘                          │
//! │                     ▼                                      │
//! │            ┌────────────────┐                              │
//! │            │ trailmark-core │                              │
//! │            │  (THE LOGIC)   │                              │
//! │            └────────────────┘                              │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start a new bookmark document
//! trailmark init
//!
//! # Bookmark operations
//! trailmark add "chapter 3" --attr shape=rectangle
//! trailmark mark -f notes.txt -l 42
//! trailmark up
//! trailmark status
//! ```

mod cli;
mod collab;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — TRAILMARK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TRAILMARK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trailmark=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Trailmark startup banner.
fn print_banner() {
    println!(
        r#"
  trailmark v{} — navigation bookmark graphs for text
"#,
        env!("CARGO_PKG_VERSION")
    );
}
