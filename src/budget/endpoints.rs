//! Route handlers for listing, setting and deleting budgets.
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    budget::{BudgetForm, Budgets},
    stores::Store,
};

/// A route handler that returns the budget of every category.
pub async fn list_budgets_endpoint<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Budgets>, Error> {
    Ok(Json(state.store.list_budgets()?))
}

/// A route handler that creates or overwrites the budget of a category and
/// responds with all budgets.
///
/// # Errors
/// Responds with 422 Unprocessable Entity if the amount is not a number.
pub async fn set_budget_endpoint<S: Store>(
    State(state): State<AppState<S>>,
    body: Result<Json<BudgetForm>, JsonRejection>,
) -> Result<Json<Budgets>, Error> {
    let Json(form) = body?;
    let amount = form.amount()?;

    let budgets = state.store.set_budget(&form.category, amount)?;
    tracing::info!("Set budget for {} to {amount}", form.category);

    Ok(Json(budgets))
}

/// A route handler that removes the budget of a category, responds with 204 No Content.
pub async fn delete_budget_endpoint<S: Store>(
    State(state): State<AppState<S>>,
    Path(category): Path<String>,
) -> Result<StatusCode, Error> {
    state.store.delete_budget(&category)?;
    tracing::info!("Deleted budget for {category}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error,
        amount::RawAmount,
        budget::{
            BudgetForm, Budgets, delete_budget_endpoint, list_budgets_endpoint,
            set_budget_endpoint,
        },
        test_utils::get_test_state,
    };

    fn budget_form(category: &str, amount: &str) -> BudgetForm {
        BudgetForm {
            category: category.to_owned(),
            amount: Some(RawAmount::Text(amount.to_owned())),
        }
    }

    #[tokio::test]
    async fn set_budget_responds_with_all_budgets() {
        let state = get_test_state();
        set_budget_endpoint(State(state.clone()), Ok(Json(budget_form("Food", "200"))))
            .await
            .unwrap();

        let Json(budgets) = set_budget_endpoint(
            State(state.clone()),
            Ok(Json(budget_form("Housing", "1200.50"))),
        )
        .await
        .unwrap();

        let want = Budgets::from([("Food".to_owned(), 200.0), ("Housing".to_owned(), 1200.5)]);
        assert_eq!(budgets, want);
        assert_eq!(list_budgets_endpoint(State(state)).await.unwrap().0, want);
    }

    #[tokio::test]
    async fn set_budget_rejects_invalid_amount() {
        let state = get_test_state();

        let result =
            set_budget_endpoint(State(state.clone()), Ok(Json(budget_form("Food", "lots")))).await;

        assert!(matches!(result, Err(Error::ValidationFailure(_))));
        assert!(list_budgets_endpoint(State(state)).await.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn delete_budget_is_no_content_even_when_missing() {
        let state = get_test_state();
        set_budget_endpoint(State(state.clone()), Ok(Json(budget_form("Food", "200"))))
            .await
            .unwrap();

        let deleted = delete_budget_endpoint(State(state.clone()), Path("Food".to_owned()))
            .await
            .unwrap();
        let deleted_again = delete_budget_endpoint(State(state.clone()), Path("Food".to_owned()))
            .await
            .unwrap();

        assert_eq!(deleted, StatusCode::NO_CONTENT);
        assert_eq!(deleted_again, StatusCode::NO_CONTENT);
        assert!(list_budgets_endpoint(State(state)).await.unwrap().0.is_empty());
    }
}
