use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::application::ExpenseService;
use crate::domain::{ListedExpense, NewExpense};

use super::ApiError;

/// Body of a successful mutation, e.g. `{"status": "success"}`.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

pub async fn list_expenses(
    State(service): State<ExpenseService>,
) -> Result<Json<Vec<ListedExpense>>, ApiError> {
    let expenses = service.list_expenses().await?;
    Ok(Json(expenses))
}

pub async fn add_expense(
    State(service): State<ExpenseService>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> Result<Json<StatusBody>, ApiError> {
    let Json(expense) = payload?;
    service.add_expense(expense).await?;
    Ok(Json(StatusBody { status: "success" }))
}

pub async fn delete_expense(
    State(service): State<ExpenseService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StatusBody>, ApiError> {
    let Path(id) = id?;
    service.delete_expense(id).await?;
    Ok(Json(StatusBody { status: "deleted" }))
}
