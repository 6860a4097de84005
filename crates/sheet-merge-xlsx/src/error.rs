//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading or writing an xlsx workbook
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The bytes are not a readable xlsx container
    #[error("Invalid XLSX file: {0}")]
    Read(String),

    /// Serializing the workbook failed
    #[error("Failed to write XLSX: {0}")]
    Write(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}
