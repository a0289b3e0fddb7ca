//! Error types for the markupdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for markupdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A title or anchor is blank, or normalizes to nothing.
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),

    /// Table rows do not match the column specifiers.
    #[error("Table row {row} has {found} cells, expected {expected}")]
    TableShape {
        /// Zero-based index of the offending row
        row: usize,
        /// Number of column specifiers
        expected: usize,
        /// Number of cells found in the row
        found: usize,
    },

    /// The storage collaborator failed to persist the document.
    #[error("Failed to write {}: {source}", path.display())]
    StorageWrite {
        /// Target file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The rendered text cannot be represented in the requested charset.
    #[error("Cannot encode {} as {encoding}", path.display())]
    Encoding {
        /// Charset name
        encoding: &'static str,
        /// Target file
        path: PathBuf,
    },

    /// Malformed input rejected at the operation boundary.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation script could not be parsed.
    #[error("Script error: {0}")]
    Script(String),

    /// I/O error outside of document writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Script(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidAnchor("blank title".to_string());
        assert_eq!(err.to_string(), "Invalid anchor: blank title");

        let err = Error::TableShape {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "Table row 2 has 1 cells, expected 3");
    }

    #[test]
    fn test_storage_error_keeps_source() {
        let err = Error::StorageWrite {
            path: PathBuf::from("out/doc.adoc"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write out/doc.adoc: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Script(_)));
    }
}
