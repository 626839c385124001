//! Error types for splice operations.

use std::fmt;
use std::path::PathBuf;

use cortex_utils_file_safety::FileError;
use serde::Serialize;
use thiserror::Error;

/// Result type for splice operations.
pub type SpliceResult<T> = Result<T, SpliceError>;

/// Errors that can occur while splicing a line range.
#[derive(Debug, Error)]
pub enum SpliceError {
    /// Target or content file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The path exists but must not be read as text (device, directory, too large...).
    #[error("{source}")]
    UnsafeFile {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// Failed to read file.
    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8.
    #[error("File {path} is not valid UTF-8 (invalid byte sequence at offset {offset})")]
    Decode { path: PathBuf, offset: usize },

    /// The requested range is rejected by the active range policy.
    #[error("Invalid line range {start}..={end} for a file with {line_count} line(s): {reason}")]
    InvalidRange {
        start: i64,
        end: i64,
        line_count: usize,
        reason: String,
    },
}

/// Coarse classification of a [`SpliceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, unreadable, unwritable or unsafe file.
    FileAccess,
    /// Content is not valid text.
    Decoding,
    /// Caller-supplied arguments are unusable.
    Argument,
}

impl ErrorKind {
    /// Stable identifier, also used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileAccess => "file_access",
            ErrorKind::Decoding => "decoding",
            ErrorKind::Argument => "argument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SpliceError {
    /// Create an invalid range error.
    pub fn invalid_range(start: i64, end: i64, line_count: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            start,
            end,
            line_count,
            reason: reason.into(),
        }
    }

    /// Wrap a file-safety rejection, keeping "not found" as its own variant.
    pub fn from_file_error(path: impl Into<PathBuf>, source: FileError) -> Self {
        let path = path.into();
        match source {
            FileError::NotFound(_) => Self::FileNotFound { path },
            source => Self::UnsafeFile { path, source },
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::UnsafeFile { .. }
            | Self::ReadError { .. }
            | Self::WriteError { .. } => ErrorKind::FileAccess,
            Self::Decode { .. } => ErrorKind::Decoding,
            Self::InvalidRange { .. } => ErrorKind::Argument,
        }
    }

    /// Path of the file involved, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileNotFound { path }
            | Self::UnsafeFile { path, .. }
            | Self::ReadError { path, .. }
            | Self::WriteError { path, .. }
            | Self::Decode { path, .. } => Some(path),
            Self::InvalidRange { .. } => None,
        }
    }
}
