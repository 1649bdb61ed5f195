use thiserror::Error;

use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ledger file is open elsewhere. Close it and try again.")]
    LedgerLocked,

    #[error("ID not found")]
    ExpenseNotFound(i64),

    #[error("{0}")]
    Ledger(String),

    #[error("Ledger task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if err.is_lock_conflict() {
            return AppError::LedgerLocked;
        }
        match err {
            StoreError::NotFound { id } => AppError::ExpenseNotFound(id),
            other => AppError::Ledger(other.to_string()),
        }
    }
}
