// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use spendlog::application::ExpenseService;
use spendlog::domain::NewExpense;
use spendlog::storage::LedgerStore;
use std::fs;
use tempfile::TempDir;

pub const HEADER: &str = "date,category,subcategory,amount,surcharge,necessity,desc\n";

/// Two-row ledger used by the delete scenarios
pub const TWO_ROW_LEDGER: &str = "date,category,subcategory,amount,surcharge,necessity,desc\n\
2024-01-01,Food,Grocery,10.0,0,need,milk\n\
2024-01-02,Fun,Movies,20.0,2,want,ticket\n";

/// Helper to create a store handle inside a fresh temporary directory.
/// The ledger file itself is not created.
pub fn temp_store() -> Result<(LedgerStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = LedgerStore::new(temp_dir.path().join("expenses.csv"));
    Ok((store, temp_dir))
}

/// Helper to create a store whose ledger holds exactly `contents`
pub fn seeded_store(contents: &str) -> Result<(LedgerStore, TempDir)> {
    let (store, temp_dir) = temp_store()?;
    fs::write(store.path(), contents)?;
    Ok((store, temp_dir))
}

/// Helper to create a test service over an initialized ledger
pub async fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = ExpenseService::init(temp_dir.path().join("expenses.csv")).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service over a ledger holding exactly `contents`
pub async fn seeded_service(contents: &str) -> Result<(ExpenseService, TempDir)> {
    let (store, temp_dir) = seeded_store(contents)?;
    Ok((ExpenseService::new(store), temp_dir))
}

pub fn read_ledger(store: &LedgerStore) -> Result<String> {
    Ok(fs::read_to_string(store.path())?)
}

/// Build a create payload with neutral defaults for the remaining fields
pub fn new_expense(date: &str, category: &str, amount: f64) -> NewExpense {
    NewExpense {
        date: date.to_string(),
        category: category.to_string(),
        subcategory: "misc".to_string(),
        amount,
        surcharge: None,
        necessity: "need".to_string(),
        desc: format!("{category} on {date}"),
    }
}
