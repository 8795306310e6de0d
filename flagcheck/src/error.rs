//! Error types for file checks.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// The kind of failure that kept a target file from being checked.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckErrorKind {
    /// The file could not be opened (missing, permission denied, wrong working directory).
    Unavailable,
    /// The file was opened but reading it failed.
    Read,
    /// The file exceeded the configured read limit.
    TooLarge,
}

/// A file-level error: the target could not be checked at all.
///
/// These are distinct from a failing verdict. A file that is readable but
/// does not satisfy its predicate is a normal negative result, never an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckError {
    /// The file could not be opened for reading.
    #[error("Failed to open file: {}", path.display())]
    Unavailable {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An I/O error occurred after the file was opened.
    #[error("Failed to read file: {}", path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file is larger than the read limit.
    #[error("File exceeds maximum size of {limit} bytes: {}", path.display())]
    TooLarge {
        /// The path being read.
        path: PathBuf,
        /// The limit in bytes.
        limit: u64,
    },
}

impl CheckError {
    /// The kind of this error, for machine-readable output.
    #[must_use]
    pub fn kind(&self) -> CheckErrorKind {
        match self {
            Self::Unavailable { .. } => CheckErrorKind::Unavailable,
            Self::Read { .. } => CheckErrorKind::Read,
            Self::TooLarge { .. } => CheckErrorKind::TooLarge,
        }
    }

    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Unavailable { path, .. }
            | Self::Read { path, .. }
            | Self::TooLarge { path, .. } => path,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display_names_path() {
        let err = CheckError::Unavailable {
            path: PathBuf::from("dirtyBook.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };

        assert_eq!(err.to_string(), "Failed to open file: dirtyBook.txt");
        assert_eq!(err.kind(), CheckErrorKind::Unavailable);
        assert_eq!(err.path(), Path::new("dirtyBook.txt"));
    }

    #[test]
    fn test_too_large_display_includes_limit() {
        let err = CheckError::TooLarge {
            path: PathBuf::from("box/key.txt"),
            limit: 16,
        };

        let formatted = err.to_string();
        assert!(formatted.contains("16 bytes"));
        assert!(formatted.contains("box/key.txt"));
        assert_eq!(err.kind(), CheckErrorKind::TooLarge);
    }
}
