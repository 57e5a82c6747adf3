//! Statistics derived from the full expense collection.

mod aggregation;
mod endpoint;

pub use aggregation::{
    BudgetStatus, CategoryTotal, ExpenseSummary, NO_CATEGORY_LABEL, TopCategory,
    UNKNOWN_MONTH_LABEL, aggregate_by_category, aggregate_by_month, budget_status,
    find_top_category, month_of, summarize,
};
pub use endpoint::{StatsResponse, get_stats_endpoint};
