//! Defines the endpoint for deleting an expense.
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{AppState, Error, expense::ExpenseId, stores::Store};

/// A route handler for deleting an expense, responds with 204 No Content.
///
/// Deleting an expense that does not exist also responds with 204 No Content.
pub async fn delete_expense_endpoint<S: Store>(
    State(state): State<AppState<S>>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    state.store.delete_expense(&expense_id)?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        expense::{ExpenseFields, ExpenseId, delete_expense_endpoint},
        stores::ExpenseStore,
        test_utils::{expense_form, get_test_state},
    };

    #[tokio::test]
    async fn deletes_expense() {
        let state = get_test_state();
        let fields = ExpenseFields::try_from(expense_form("2024-01-05", "Food", "Lunch", "12.50"))
            .unwrap();
        let expense = state.store.create_expense(fields).unwrap();

        let status = delete_expense_endpoint(State(state.clone()), Path(expense.id))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.store.list_expenses().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_expense_is_no_content() {
        let state = get_test_state();

        let status = delete_expense_endpoint(State(state), Path(ExpenseId::new("1")))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
