//! Error types for sheet-merge-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheet-merge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A conflicting decision was handed to the writer without a resolution
    #[error("Cell {0} is an unresolved conflict and cannot be applied")]
    UnresolvedConflict(String),

    /// The decision source ran out of input before every conflict was resolved
    #[error("Input ended with {remaining} of {total} conflicts unresolved")]
    InputExhausted { remaining: usize, total: usize },

    /// IO error while talking to a decision source
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
