//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors raised by the library.
///
/// Malformed dates and non-numeric cells are recovered locally and never
/// surface here. Of the data problems, only a schema violation aborts a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Required columns are absent from the input table
    #[error("Schema violation: missing required column(s): {}", .missing.join(", "))]
    SchemaViolation { missing: Vec<String> },

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid analysis configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
