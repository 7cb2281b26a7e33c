//! Error types for the PostScript formatting library.

use thiserror::Error;

/// Primary error type for formatting operations.
#[derive(Error, Debug)]
pub enum FormatterError {
    /// Malformed token in the source stream (unterminated string, bad
    /// delimiter sequence, unparseable embedded-stream span list).
    #[error("syntax error at line {line}, column {column}: {msg}")]
    Reader { line: u32, column: u32, msg: String },

    /// An internal tree invariant was violated. This is a programming
    /// fault, not a recoverable input condition.
    #[error("analysis inconsistency: {0}")]
    AnalysisInconsistency(String),

    /// The tracing prologue resource is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The format call was cancelled at a phase boundary.
    #[error("formatting cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatterError {
    pub(crate) fn reader(line: u32, column: u32, msg: impl Into<String>) -> Self {
        Self::Reader {
            line,
            column,
            msg: msg.into(),
        }
    }
}

/// Convenience Result type alias for FormatterError.
pub type Result<T> = std::result::Result<T, FormatterError>;
