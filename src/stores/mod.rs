//! Contains traits and implementations for objects that store expenses and budgets.

mod sqlite;

pub use sqlite::SQLiteStore;

use crate::{
    Error,
    budget::Budgets,
    expense::{Expense, ExpenseFields, ExpenseId},
};

/// Handles the creation, retrieval, update and deletion of expenses.
pub trait ExpenseStore {
    /// Retrieve every expense, latest date first.
    fn list_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// Create a new expense with a freshly assigned, unique ID.
    fn create_expense(&self, fields: ExpenseFields) -> Result<Expense, Error>;

    /// Replace the fields of the expense `id`.
    ///
    /// Implementers should return [Error::NotFound] if no expense has the ID `id`.
    fn update_expense(&self, id: &ExpenseId, fields: ExpenseFields) -> Result<Expense, Error>;

    /// Delete the expense `id`.
    ///
    /// Deleting an expense that does not exist must succeed without changes.
    fn delete_expense(&self, id: &ExpenseId) -> Result<(), Error>;

    /// Insert existing expenses keeping their IDs, skipping IDs that already
    /// exist. Returns how many expenses were inserted.
    fn import_expenses(&self, expenses: &[Expense]) -> Result<usize, Error>;
}

/// Handles the spending limit of each category.
pub trait BudgetStore {
    /// Get the budget of every category.
    fn list_budgets(&self) -> Result<Budgets, Error>;

    /// Create or overwrite the budget of `category` and return all budgets.
    fn set_budget(&self, category: &str, amount: f64) -> Result<Budgets, Error>;

    /// Remove the budget of `category`, a no-op if it has none.
    fn delete_budget(&self, category: &str) -> Result<(), Error>;
}

/// A store that can back the whole application.
pub trait Store: ExpenseStore + BudgetStore + Clone + Send + Sync + 'static {}

impl<T> Store for T where T: ExpenseStore + BudgetStore + Clone + Send + Sync + 'static {}
