//! Error types for table operations, benchmarking and result output

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised anywhere in the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Requested column is not part of the table
    #[error("Missing column '{name}'")]
    MissingColumn { name: String },

    /// Column exists but holds the wrong kind of data
    #[error("Column '{name}' has wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Argument outside its valid domain
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// Column lengths disagree inside one table
    #[error("Column length mismatch: expected {expected} rows, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Output location cannot be created, written or read
    #[error("Resource unavailable at '{}': {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    Plot(String),
}

impl Error {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_column() {
        let err = Error::MissingColumn {
            name: "data0".to_string(),
        };
        assert_eq!(err.to_string(), "Missing column 'data0'");
    }

    #[test]
    fn test_display_invalid_parameter() {
        let err = Error::invalid("window_sizes", "window size must be >= 1, got 0");
        let display = err.to_string();
        assert!(display.contains("'window_sizes'"));
        assert!(display.contains("got 0"));
    }

    #[test]
    fn test_resource_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::resource(
            "/no/such/dir",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/no/such/dir"));
        assert!(err.source().is_some());
    }
}
