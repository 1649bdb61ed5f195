//! HTTP surface of the expense ledger.

mod error;
mod handlers;
mod view;

pub use error::ApiError;

use axum::routing::{delete, get};
use axum::Router;

use crate::application::ExpenseService;

/// Build the application router over `service`.
pub fn router(service: ExpenseService) -> Router {
    Router::new()
        .route("/", get(view::index))
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/api/expenses/{id}", delete(handlers::delete_expense))
        .with_state(service)
}
