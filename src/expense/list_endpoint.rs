//! Defines the endpoint for listing every expense.
use axum::{Json, extract::State};

use crate::{AppState, Error, expense::Expense, stores::Store};

/// A route handler that returns every expense, latest date first.
pub async fn list_expenses_endpoint<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Expense>>, Error> {
    let expenses = state.store.list_expenses()?;

    Ok(Json(expenses))
}
