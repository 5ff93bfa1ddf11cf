//! Error types for the data-loader crate.
//!
//! Every failure that can happen while reading the two artifacts maps to
//! one variant here, so startup can abort with a message that names the
//! file (and line, where there is one).

use thiserror::Error;

/// Errors that can occur while loading the catalog and similarity matrix
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in an artifact couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Catalog and matrix disagree on size, or the matrix is not square
    #[error("Dimension mismatch: {what} (expected {expected}, found {found})")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// Two catalog rows share the same movie id
    #[error("Duplicate movie id {id} at rows {first} and {second}")]
    DuplicateMovie { id: u32, first: usize, second: usize },

    /// A similarity entry is NaN or infinite
    #[error("Non-finite similarity at ({row}, {col})")]
    NonFiniteValue { row: usize, col: usize },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
