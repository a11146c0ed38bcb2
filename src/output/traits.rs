//! Report sink trait and errors
//!
//! A report sink persists two kinds of output: named structured artifacts
//! (one JSON document per check) and named running summaries (Markdown,
//! appended one line at a time).

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact name: {0}")]
    InvalidName(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for check results
pub trait ReportSink {
    /// Writes (replacing) the structured artifact `name`
    fn save_json(&self, name: &str, value: &Value) -> OutputResult<()>;

    /// Appends one line to the running summary `name`
    fn append_markdown(&self, name: &str, line: &str) -> OutputResult<()>;
}

/// Checks that an artifact name is a plain file stem
pub(crate) fn validate_name(name: &str) -> OutputResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(OutputError::InvalidName(name.to_string()))
    }
}
