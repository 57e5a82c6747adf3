//! Defines the endpoint for replacing the fields of an expense.
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    AppState, Error,
    expense::{Expense, ExpenseFields, ExpenseForm, ExpenseId},
    stores::Store,
};

/// A route handler for updating an expense, responds with the updated expense.
///
/// The ID and creation time of the expense never change.
///
/// # Errors
/// Responds with 404 Not Found if there is no expense with the ID `expense_id`.
pub async fn update_expense_endpoint<S: Store>(
    State(state): State<AppState<S>>,
    Path(expense_id): Path<ExpenseId>,
    body: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Json(form) = body?;
    let fields = ExpenseFields::try_from(form)?;

    let expense = state.store.update_expense(&expense_id, fields)?;
    tracing::info!("Updated expense {expense_id}");

    Ok(Json(expense))
}
