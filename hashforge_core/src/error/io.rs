//! I/O related error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// I/O error raised by a stream or file driver
#[derive(Error, Debug)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path being hashed (if the source was a file)
    pub path: Option<PathBuf>,
    /// Number of bytes successfully consumed before the failure
    pub offset: Option<u64>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<std::io::Error>,
}

/// Kind of I/O error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoErrorKind {
    /// File not found
    FileNotFound,
    /// Permission denied
    PermissionDenied,
    /// A read failed partway through the input
    ReadFailed,
    /// Generic I/O error
    Other,
}

impl IoError {
    /// Create a file not found error
    pub fn file_not_found(path: &Path) -> Self {
        Self {
            kind: IoErrorKind::FileNotFound,
            path: Some(path.to_path_buf()),
            offset: None,
            source: None,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: &Path, source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::PermissionDenied,
            path: Some(path.to_path_buf()),
            offset: None,
            source: Some(source),
        }
    }

    /// Create an error for a read that failed after `offset` bytes
    pub fn read_failed(offset: u64, source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::ReadFailed,
            path: None,
            offset: Some(offset),
            source: Some(source),
        }
    }

    /// Create an I/O error from a standard I/O error
    pub fn from_std(source: std::io::Error) -> Self {
        let kind = match source.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            _ => IoErrorKind::Other,
        };

        Self {
            kind,
            path: None,
            offset: None,
            source: Some(source),
        }
    }

    /// Attach the path of the file being hashed
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }
}

fn format_io_error(error: &IoError) -> String {
    match (&error.kind, &error.path) {
        (IoErrorKind::FileNotFound, Some(path)) => {
            format!("File not found: {}", path.display())
        }
        (IoErrorKind::FileNotFound, None) => "File not found".to_string(),
        (IoErrorKind::PermissionDenied, Some(path)) => {
            format!("Permission denied for file: {}", path.display())
        }
        (IoErrorKind::PermissionDenied, None) => "Permission denied".to_string(),
        (IoErrorKind::ReadFailed, path) => {
            let mut message = format!("Read failed after {} bytes", error.offset.unwrap_or(0));
            if let Some(path) = path {
                message.push_str(&format!(" of {}", path.display()));
            }
            if let Some(source) = &error.source {
                message.push_str(&format!(": {source}"));
            }
            message
        }
        (IoErrorKind::Other, _) => {
            if let Some(source) = &error.source {
                format!("I/O error: {source}")
            } else {
                "I/O error".to_string()
            }
        }
    }
}
