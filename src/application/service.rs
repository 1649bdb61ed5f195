use log::{debug, error, info, warn};
use std::path::PathBuf;

use crate::domain::{ExpenseRecord, ListedExpense, NewExpense};
use crate::storage::{LedgerStore, StoreError};

use super::AppError;

/// Application service providing the expense ledger operations.
/// This is the interface the HTTP handlers talk to.
///
/// Ledger access is blocking file I/O, so every call runs on tokio's
/// blocking pool with its own clone of the store handle.
#[derive(Debug, Clone)]
pub struct ExpenseService {
    store: LedgerStore,
}

impl ExpenseService {
    /// Create a new expense service over the given store.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledger at `path`, creating it with just a header if missing.
    ///
    /// A ledger that cannot be created is logged and otherwise ignored: the
    /// service still starts, and requests fail until the file becomes
    /// available.
    pub async fn init(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let service = Self::new(LedgerStore::new(path));
        let path = service.store.path().display().to_string();

        match service.run_blocking(LedgerStore::init).await? {
            Ok(true) => info!("created ledger {}", path),
            Ok(false) => debug!("using existing ledger {}", path),
            Err(err) if err.is_lock_conflict() => {
                error!("cannot create ledger {}: is it open in another program? ({})", path, err)
            }
            Err(err) => error!("cannot create ledger {}: {}", path, err),
        }

        Ok(service)
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// List all expenses with their positional ids.
    pub async fn list_expenses(&self) -> Result<Vec<ListedExpense>, AppError> {
        let expenses = self.run_blocking(LedgerStore::list).await?.map_err(|err| {
            warn!("failed to list expenses: {}", err);
            AppError::from(err)
        })?;
        debug!("listed {} expenses", expenses.len());
        Ok(expenses)
    }

    /// Record a new expense at the end of the ledger.
    ///
    /// Every failure, a locked file included, is reported with its raw message.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<ExpenseRecord, AppError> {
        let record = self
            .run_blocking(move |store| store.append(expense))
            .await?
            .map_err(append_failure)?;
        info!(
            "recorded expense {} {}/{} {}",
            record.date, record.category, record.subcategory, record.amount
        );
        Ok(record)
    }

    /// Delete the expense at positional id `id`.
    pub async fn delete_expense(&self, id: i64) -> Result<(), AppError> {
        self.run_blocking(move |store| store.delete_by_id(id))
            .await?
            .map_err(|err| {
                match &err {
                    StoreError::NotFound { .. } => debug!("delete of unknown expense {}", id),
                    _ => warn!("failed to delete expense {}: {}", id, err),
                }
                AppError::from(err)
            })?;
        info!("deleted expense {}", id);
        Ok(())
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<Result<T, StoreError>, AppError>
    where
        F: FnOnce(&LedgerStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || op(&store)).await?)
    }
}

/// Append failures are never classified: even a locked ledger is reported
/// with its raw message.
fn append_failure(err: StoreError) -> AppError {
    warn!("failed to record expense: {}", err);
    AppError::Ledger(err.to_string())
}
