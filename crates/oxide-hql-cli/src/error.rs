//! Error types for the command-line tool.

use std::path::PathBuf;

/// Errors that can occur while reading input or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// Path of the input file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Standard input could not be read.
    #[error("Failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    /// A report could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the command-line tool.
pub type Result<T> = std::result::Result<T, CliError>;
