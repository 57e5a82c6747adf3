//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the request body used to create and update it
//! - Database functions for storing, listing, updating and deleting expenses
//! - Route handlers for the expense API and the CSV export

mod model;
mod create_endpoint;
mod delete_endpoint;
mod export_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use model::{
    Expense, ExpenseFields, ExpenseForm, ExpenseId, create_expense, create_expense_table,
    delete_expense, import_expenses, list_expenses, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use export_endpoint::export_expenses_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use update_endpoint::update_expense_endpoint;

/// The categories offered to the user when recording an expense.
///
/// Categories are not validated, an expense may use any category name.
pub const CATEGORIES: [&str; 8] = [
    "Housing",
    "Food",
    "Transportation",
    "Utilities",
    "Insurance",
    "Health",
    "Entertainment",
    "Other",
];
