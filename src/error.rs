//! Pipeline error categories
//!
//! Each variant marks which stage gave up: the provider fetch, payload
//! parsing, the CSV log on disk, or a news file missing its required
//! columns. Callers mostly carry these inside `anyhow::Error` and add
//! context at the call site.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("missing columns {columns:?} in {file}")]
    MissingColumns { file: String, columns: Vec<String> },
}

/// Result type alias for pipeline operations
pub type Result<T> = anyhow::Result<T>;
