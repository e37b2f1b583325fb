//! Error types for header parsing

use thiserror::Error;

/// Result type alias for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error raised while reading or parsing an annotated header.
///
/// Parsing never recovers: a header that produces an error is not a valid
/// binding surface and must be skipped as a whole.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Grammar or structural violation at a specific line
    #[error("{path}:{line} {message}")]
    Syntax {
        path: String,
        line: usize,
        message: String,
    },

    /// The header could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// The 1-based line of a syntax error.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { line, .. } => Some(*line),
            ParseError::Io { .. } => None,
        }
    }

    /// The path of the offending header.
    pub fn path(&self) -> &str {
        match self {
            ParseError::Syntax { path, .. } | ParseError::Io { path, .. } => path,
        }
    }

    /// The human-readable message without location.
    pub fn message(&self) -> String {
        match self {
            ParseError::Syntax { message, .. } => message.clone(),
            ParseError::Io { source, .. } => source.to_string(),
        }
    }
}
