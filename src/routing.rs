//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    budget::{delete_budget_endpoint, list_budgets_endpoint, set_budget_endpoint},
    endpoints,
    expense::{
        CATEGORIES, create_expense_endpoint, delete_expense_endpoint, export_expenses_endpoint,
        list_expenses_endpoint, update_expense_endpoint,
    },
    logging_middleware,
    stats::get_stats_endpoint,
    stores::Store,
};

/// Return a router with all the app's routes.
///
/// Any origin may call the API since the frontend is served separately.
pub fn build_router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint::<S>).post(create_expense_endpoint::<S>),
        )
        .route(
            endpoints::EXPORT_EXPENSES,
            get(export_expenses_endpoint::<S>),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint::<S>).delete(delete_expense_endpoint::<S>),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint::<S>).post(set_budget_endpoint::<S>),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint::<S>))
        .route(endpoints::STATS, get(get_stats_endpoint::<S>))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Lets clients check that the API is up.
async fn get_root() -> &'static str {
    "API is running!"
}

/// The categories a client should offer when recording an expense.
async fn get_categories() -> Json<[&'static str; 8]> {
    Json(CATEGORIES)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}
