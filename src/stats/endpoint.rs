//! Defines the endpoint for the aggregated expense statistics.
use axum::{Json, extract::State};
use serde::Serialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    budget::Budgets,
    stats::aggregation::{BudgetStatus, ExpenseSummary, budget_status, summarize},
    stores::Store,
};

const MONTH_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]");

/// The statistics shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    /// Totals overall, by category, by month and the top category.
    #[serde(flatten)]
    pub summary: ExpenseSummary,
    /// The month used for `this_month`, e.g. "2024-01".
    pub current_month: String,
    /// The total spent in the current month.
    pub this_month: f64,
    /// How much of each budget has been spent.
    pub budgets: Vec<BudgetStatus>,
}

/// A route handler that aggregates every expense into dashboard statistics.
///
/// The current month is taken from the UTC date.
pub async fn get_stats_endpoint<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<StatsResponse>, Error> {
    let expenses = state.store.list_expenses()?;
    let budgets = state.store.list_budgets()?;

    Ok(Json(build_stats(
        summarize(&expenses),
        &budgets,
        OffsetDateTime::now_utc(),
    )))
}

fn build_stats(
    summary: ExpenseSummary,
    budgets: &Budgets,
    now: OffsetDateTime,
) -> StatsResponse {
    let current_month = now.format(MONTH_FORMAT).unwrap_or_else(|error| {
        tracing::error!("Could not format the current month: {error}");
        String::new()
    });
    let this_month = summary.month_total(&current_month);
    let budgets = budget_status(&summary, budgets);

    StatsResponse {
        summary,
        current_month,
        this_month,
        budgets,
    }
}
