//! Defines the budget model and database queries for budgets.

use std::collections::BTreeMap;

use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    Error,
    amount::{RawAmount, coerce_amount},
};

/// The spending limit for each category, keyed by category name.
pub type Budgets = BTreeMap<String, f64>;

/// The request body for setting the budget of a category.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The category the budget applies to.
    pub category: String,
    /// The spending limit, not yet coerced.
    #[serde(default)]
    pub amount: Option<RawAmount>,
}

impl BudgetForm {
    /// Coerce the limit into a finite number.
    ///
    /// # Errors
    /// Returns [Error::ValidationFailure] if the amount is missing or invalid.
    pub fn amount(&self) -> Result<f64, Error> {
        coerce_amount(self.amount.as_ref())
    }
}

/// Get the budget of every category.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn list_budgets(connection: &Connection) -> Result<Budgets, Error> {
    connection
        .prepare("SELECT category, amount FROM budget")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Create or overwrite the budget for `category`.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn set_budget(category: &str, amount: f64, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO budget (category, amount) VALUES (?1, ?2)
         ON CONFLICT(category) DO UPDATE SET amount = excluded.amount",
        params![category, amount],
    )?;

    Ok(())
}

/// Remove the budget for `category`, removing a missing budget is not an error.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn delete_budget(category: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM budget WHERE category = ?1", params![category])?;

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                category TEXT PRIMARY KEY NOT NULL,
                amount REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        budget::model::{Budgets, delete_budget, list_budgets, set_budget},
        db::initialize,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn starts_empty() {
        let conn = get_test_connection();

        assert_eq!(list_budgets(&conn).unwrap(), Budgets::new());
    }

    #[test]
    fn set_overwrites_existing_budget() {
        let conn = get_test_connection();

        set_budget("Food", 200.0, &conn).unwrap();
        set_budget("Housing", 1200.0, &conn).unwrap();
        set_budget("Food", 250.0, &conn).unwrap();

        let want = Budgets::from([("Food".to_owned(), 250.0), ("Housing".to_owned(), 1200.0)]);
        assert_eq!(list_budgets(&conn).unwrap(), want);
    }

    #[test]
    fn delete_removes_only_that_category() {
        let conn = get_test_connection();
        set_budget("Food", 200.0, &conn).unwrap();
        set_budget("Health", 50.0, &conn).unwrap();

        delete_budget("Food", &conn).unwrap();

        let want = Budgets::from([("Health".to_owned(), 50.0)]);
        assert_eq!(list_budgets(&conn).unwrap(), want);
    }

    #[test]
    fn delete_missing_budget_is_not_an_error() {
        let conn = get_test_connection();

        assert_eq!(delete_budget("Entertainment", &conn), Ok(()));
    }
}
