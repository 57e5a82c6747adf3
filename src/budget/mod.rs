//! Per-category spending limits.

mod endpoints;
mod model;

pub use endpoints::{delete_budget_endpoint, list_budgets_endpoint, set_budget_endpoint};
pub use model::{
    BudgetForm, Budgets, create_budget_table, delete_budget, list_budgets, set_budget,
};
