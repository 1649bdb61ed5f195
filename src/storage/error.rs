use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Ledger file {} is locked by another process", path.display())]
    LockConflict { path: PathBuf },

    #[error("No expense with id {id}")]
    NotFound { id: i64 },

    #[error("Malformed ledger row at line {line}: invalid {column} value {value:?}")]
    MalformedRow {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// Wrap an I/O error raised while touching `path`, classifying lock conflicts.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        if is_lock_error(&err) {
            StoreError::LockConflict {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io(err)
        }
    }

    /// Wrap a CSV error raised while touching `path`, classifying lock conflicts.
    pub fn from_csv(path: &Path, err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            if is_lock_error(io_err) {
                return StoreError::LockConflict {
                    path: path.to_path_buf(),
                };
            }
        }
        StoreError::Csv(err)
    }

    pub fn is_lock_conflict(&self) -> bool {
        match self {
            StoreError::LockConflict { .. } => true,
            StoreError::Io(err) => is_lock_error(err),
            StoreError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(e) if is_lock_error(e)),
            _ => false,
        }
    }
}

/// Whether an I/O error means another program holds the file.
///
/// Windows reports a file held open elsewhere as a sharing (32) or lock (33)
/// violation; elsewhere the closest equivalent is a permission error.
pub fn is_lock_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}
