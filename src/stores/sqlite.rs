//! Implements a SQLite backed expense and budget store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{self, Budgets},
    db::initialize,
    expense::{self, Expense, ExpenseFields, ExpenseId},
    stores::{BudgetStore, ExpenseStore},
};

/// Stores expenses and budgets in a SQLite database, one row per record.
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models if they do not exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire the database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl ExpenseStore for SQLiteStore {
    fn list_expenses(&self) -> Result<Vec<Expense>, Error> {
        expense::list_expenses(&*self.lock()?)
    }

    fn create_expense(&self, fields: ExpenseFields) -> Result<Expense, Error> {
        expense::create_expense(fields, OffsetDateTime::now_utc(), &*self.lock()?)
    }

    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid expense,
    /// - or [Error::StorageUnavailable] if there is some other SQL error.
    fn update_expense(&self, id: &ExpenseId, fields: ExpenseFields) -> Result<Expense, Error> {
        expense::update_expense(id, fields, &*self.lock()?)
    }

    fn delete_expense(&self, id: &ExpenseId) -> Result<(), Error> {
        let rows_affected = expense::delete_expense(id, &*self.lock()?)?;

        if rows_affected == 0 {
            tracing::debug!("tried to delete expense {id} which does not exist");
        }

        Ok(())
    }

    fn import_expenses(&self, expenses: &[Expense]) -> Result<usize, Error> {
        expense::import_expenses(expenses, &*self.lock()?)
    }
}

impl BudgetStore for SQLiteStore {
    fn list_budgets(&self) -> Result<Budgets, Error> {
        budget::list_budgets(&*self.lock()?)
    }

    fn set_budget(&self, category: &str, amount: f64) -> Result<Budgets, Error> {
        let connection = self.lock()?;
        budget::set_budget(category, amount, &connection)?;

        budget::list_budgets(&connection)
    }

    fn delete_budget(&self, category: &str) -> Result<(), Error> {
        budget::delete_budget(category, &*self.lock()?)
    }
}
