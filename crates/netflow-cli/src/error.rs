//! Error types for the netflow CLI.

use netflow_graph::GraphError;
use thiserror::Error;

/// CLI result type alias.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type.
#[derive(Error, Debug)]
pub enum CliError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input pattern does not compile or lacks required groups.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Blank line followed by more arcs.
    #[error("Line {line}: empty line inside the arc list")]
    EmptyLine { line: usize },

    /// Input line not matched by the pattern.
    #[error("Line {line}: does not match pattern: {text:?}")]
    PatternMismatch { line: usize, text: String },

    /// Cost or capacity that is not a number.
    #[error("Line {line}: invalid {field} value {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Node name not present in the input.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Graph construction or solver failure.
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output serialization error.
    #[error("Output error: {0}")]
    Output(String),
}

impl From<regex::Error> for CliError {
    fn from(e: regex::Error) -> Self {
        CliError::InvalidPattern(e.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
