//! Implements a struct that holds the state of the REST server.

use rusqlite::Connection;

use crate::{
    Error,
    stores::{SQLiteStore, Store},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S: Store> {
    /// The store for managing [expenses](crate::Expense) and budgets.
    pub store: S,
}

impl<S: Store> AppState<S> {
    /// Create a new [AppState].
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    Ok(AppState::new(SQLiteStore::new(db_connection)?))
}
