//! Defines the endpoint for creating a new expense.
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    expense::{Expense, ExpenseFields, ExpenseForm},
    stores::Store,
};

/// A route handler for creating a new expense, responds with the stored expense.
///
/// # Errors
/// Responds with 422 Unprocessable Entity if the amount is not a number and
/// 400 Bad Request if the body is not a JSON object.
pub async fn create_expense_endpoint<S: Store>(
    State(state): State<AppState<S>>,
    body: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let Json(form) = body?;
    let fields = ExpenseFields::try_from(form)?;

    let expense = state.store.create_expense(fields)?;
    tracing::info!("Created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}
