//! CLI support for jmespath-engine
//!
//! Provides programmatic access to the `jp` commands for embedding in
//! other tools.

mod docs;
mod search;

pub use docs::get_functions_overview;
pub use search::{SearchOptions, SearchResult, execute_search, render};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Expression failed to compile or evaluate
    #[error("{0}")]
    Query(#[from] crate::JmesPathError),

    /// Input document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
