//! Storage layer error types.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading through the file handle cache.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO failure on {path}: {source}")]
    IoFailure {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Read of {requested} bytes from {path} exceeds limit of {limit} bytes")]
    ReadTooLarge {
        path: String,
        requested: usize,
        limit: usize,
    },
}

impl StorageError {
    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        StorageError::IoFailure {
            path: path.to_string(),
            source,
        }
    }

    /// Path the failed operation was issued against
    pub fn path(&self) -> &str {
        match self {
            StorageError::IoFailure { path, .. } | StorageError::ReadTooLarge { path, .. } => path,
        }
    }

    /// Kind of the underlying I/O error, if there is one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            StorageError::IoFailure { source, .. } => Some(source.kind()),
            StorageError::ReadTooLarge { .. } => None,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::io(
            "/data/part-0.col",
            io::Error::new(io::ErrorKind::UnexpectedEof, "failed to fill whole buffer"),
        );
        assert_eq!(
            err.to_string(),
            "IO failure on /data/part-0.col: failed to fill whole buffer"
        );
        assert_eq!(err.path(), "/data/part-0.col");
        assert_eq!(err.io_kind(), Some(io::ErrorKind::UnexpectedEof));

        let err = StorageError::ReadTooLarge {
            path: "f".to_string(),
            requested: 10,
            limit: 4,
        };
        assert_eq!(
            err.to_string(),
            "Read of 10 bytes from f exceeds limit of 4 bytes"
        );
        assert_eq!(err.io_kind(), None);
    }
}
