//! Error types for BAM operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of the weight matrix a pattern was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The `A` side: flattened length must equal `weight.rows` (N*M).
    Left,
    /// The `B` side: flattened length must equal `weight.cols` (M*P).
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Coarse classification of a [`BamError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreadable, unwritable or malformed.
    File,
    /// Buffer allocation failed.
    Memory,
    /// Pattern size does not fit the weight matrix.
    Dimension,
    /// Recall hit the iteration ceiling.
    Convergence,
    /// Configuration could not be parsed.
    Config,
}

/// BAM error types.
#[derive(Error, Debug)]
pub enum BamError {
    /// I/O failure on a store or pattern file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store or pattern file content is malformed
    #[error("Malformed file {} (line {line}): {reason}", .path.display())]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Could not reserve a buffer
    #[error("Allocation of {elements} elements failed")]
    Memory { elements: usize },

    /// Pattern does not fit the weight matrix
    #[error("Dimension mismatch on {side} side: expected {expected}, got {got}")]
    Dimension {
        side: Side,
        expected: usize,
        got: usize,
    },

    /// Recall did not settle within the configured ceiling
    #[error("Recall did not converge within {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// Configuration parse error
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl BamError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BamError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        BamError::Format {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Tagged kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BamError::Io { .. } | BamError::Format { .. } => ErrorKind::File,
            BamError::Memory { .. } => ErrorKind::Memory,
            BamError::Dimension { .. } => ErrorKind::Dimension,
            BamError::NoConvergence { .. } => ErrorKind::Convergence,
            BamError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for BAM operations.
pub type Result<T> = std::result::Result<T, BamError>;
