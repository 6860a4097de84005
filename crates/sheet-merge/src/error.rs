//! Error types for merge jobs

use std::path::PathBuf;

use sheet_merge_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`MergeError`]
pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Errors that abort a merge job
///
/// Every variant is reported once and ends the run; nothing is retried.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Missing or invalid options, malformed JSON configuration
    #[error("{0}")]
    Config(String),

    /// An input workbook is missing or unreadable
    #[error("{0}")]
    Input(String),

    /// An input workbook is not a valid xlsx file
    #[error("'{}' could not be read as a workbook", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    /// The output directory or file could not be written
    #[error("Could not write '{}'", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    /// Applying or resolving the merge failed
    #[error("Merge failed")]
    Resolve(#[from] sheet_merge_core::Error),
}

impl MergeError {
    /// Create a configuration error with a message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MergeError::Config(msg.into())
    }

    /// The error for an input path that does not exist
    pub fn not_found(path: &std::path::Path) -> Self {
        MergeError::Input(format!("'{}' is not found.", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_not_found_message() {
        let err = MergeError::not_found(Path::new("data/base.xlsx"));
        assert_eq!(err.to_string(), "'data/base.xlsx' is not found.");
    }

    #[test]
    fn test_resolve_from_core_error() {
        let err: MergeError = sheet_merge_core::Error::InputExhausted {
            remaining: 2,
            total: 3,
        }
        .into();
        assert_eq!(err.to_string(), "Merge failed");
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("Input ended with 2 of 3 conflicts unresolved".to_string())
        );
    }

    #[test]
    fn test_format_error_names_path_once() {
        let err = MergeError::Format {
            path: PathBuf::from("b.xlsx"),
            source: XlsxError::Read("bad zip".into()),
        };
        assert_eq!(err.to_string(), "'b.xlsx' could not be read as a workbook");
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("Invalid XLSX file: bad zip".to_string())
        );
    }
}
