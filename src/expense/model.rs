//! Defines the core data models and database queries for expenses.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::{RawAmount, coerce_amount},
};

// ============================================================================
// MODELS
// ============================================================================

/// The identifier of an expense.
///
/// Newly created expenses get the millisecond Unix timestamp of their
/// creation, imported expenses keep whatever identifier they had before.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money spent on something, recorded on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense. Never changes once assigned.
    pub id: ExpenseId,
    /// When the expense happened, expected to be an ISO 8601 date, e.g. "2024-01-05".
    pub date: String,
    /// The category of the expense, e.g. "Food".
    pub category: String,
    /// A text description of what the expense was for.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The user editable fields of an [Expense] with a coerced amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFields {
    /// When the expense happened.
    pub date: String,
    /// The category of the expense.
    pub category: String,
    /// A text description of what the expense was for.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
}

/// The request body for creating or updating an expense.
///
/// Text fields default to an empty string. The amount may be a JSON number
/// or a numeric string and is coerced by [ExpenseFields::try_from].
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// When the expense happened.
    #[serde(default)]
    pub date: String,
    /// The category of the expense.
    #[serde(default)]
    pub category: String,
    /// A text description of what the expense was for.
    #[serde(default)]
    pub description: String,
    /// The amount of money spent, not yet coerced.
    #[serde(default)]
    pub amount: Option<RawAmount>,
}

impl TryFrom<ExpenseForm> for ExpenseFields {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        let amount = coerce_amount(form.amount.as_ref())?;

        Ok(Self {
            date: form.date,
            category: form.category,
            description: form.description,
            amount,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, date, category, description, amount, created_at";

/// Create a new expense, assigning it an ID derived from `created_at`.
///
/// The ID is the millisecond timestamp of `created_at`, or one more than the
/// last issued ID if that is later, so an ID is never issued twice even after
/// the expense holding it is deleted. If the ID is taken by an imported
/// expense, the next free integer is used instead.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn create_expense(
    fields: ExpenseFields,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    let tx = connection.unchecked_transaction()?;

    let timestamp_id = (created_at.unix_timestamp_nanos() / 1_000_000) as i64;
    let mut candidate_id = match last_issued_id(&tx)? {
        Some(last_issued) => timestamp_id.max(last_issued + 1),
        None => timestamp_id,
    };

    let expense = {
        let mut statement = tx.prepare(&format!(
            "INSERT INTO expense ({EXPENSE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {EXPENSE_COLUMNS}"
        ))?;

        loop {
            let result = statement.query_row(
                params![
                    candidate_id.to_string(),
                    fields.date,
                    fields.category,
                    fields.description,
                    fields.amount,
                    created_at,
                ],
                map_expense_row,
            );

            match result {
                Err(rusqlite::Error::SqliteFailure(error, _))
                    if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        || error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    tracing::debug!("expense ID {candidate_id} is taken, trying the next one");
                    candidate_id += 1;
                }
                result => break result?,
            }
        }
    };

    record_issued_id(candidate_id, &tx)?;
    tx.commit()?;

    Ok(expense)
}

/// Retrieve all expenses, latest date first.
///
/// Expenses on the same date are listed most recently created first.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn list_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense ORDER BY date DESC, rowid DESC"
        ))?
        .query_map([], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Replace the date, category, description and amount of the expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::StorageUnavailable] if there is some other SQL error.
pub fn update_expense(
    id: &ExpenseId,
    fields: ExpenseFields,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "UPDATE expense
             SET date = ?1, category = ?2, description = ?3, amount = ?4
             WHERE id = ?5
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            params![
                fields.date,
                fields.category,
                fields.description,
                fields.amount,
                id.as_str(),
            ],
            map_expense_row,
        )
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Delete the expense `id`, deleting an expense that does not exist is not an error.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn delete_expense(id: &ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expense WHERE id = :id", &[(":id", id.as_str())])
        .map_err(Error::from)
}

/// Insert existing expenses, keeping their IDs.
///
/// Expenses whose ID already exists are skipped. Numeric IDs count as issued,
/// so [create_expense] will not reuse them. Expenses are inserted in
/// the order given, so pass the oldest expense first.
///
/// # Errors
/// This function will return a [Error::StorageUnavailable] if there is an SQL error.
pub fn import_expenses(expenses: &[Expense], connection: &Connection) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;
    let mut imported_count = 0;

    {
        let mut statement = tx.prepare(&format!(
            "INSERT INTO expense ({EXPENSE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO NOTHING"
        ))?;

        for expense in expenses {
            imported_count += statement.execute(params![
                expense.id.as_str(),
                expense.date,
                expense.category,
                expense.description,
                expense.amount,
                expense.created_at,
            ])?;

            if let Ok(numeric_id) = expense.id.as_str().parse::<i64>() {
                record_issued_id(numeric_id, &tx)?;
            }
        }
    }

    tx.commit()?;

    Ok(imported_count)
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id TEXT PRIMARY KEY NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    // A single row holding the highest ID issued so far.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_id_sequence (
                id INTEGER PRIMARY KEY CHECK (id = 0),
                last_issued INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn last_issued_id(connection: &Connection) -> Result<Option<i64>, rusqlite::Error> {
    connection
        .query_row(
            "SELECT last_issued FROM expense_id_sequence WHERE id = 0",
            [],
            |row| row.get(0),
        )
        .optional()
}

fn record_issued_id(id: i64, connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "INSERT INTO expense_id_sequence (id, last_issued) VALUES (0, ?1)
         ON CONFLICT(id) DO UPDATE SET last_issued = max(last_issued, excluded.last_issued)",
        [id],
    )?;

    Ok(())
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id: String = row.get(0)?;
    let date = row.get(1)?;
    let category = row.get(2)?;
    let description = row.get(3)?;
    let amount = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Expense {
        id: ExpenseId::new(id),
        date,
        category,
        description,
        amount,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Error,
        db::initialize,
        expense::model::{
            Expense, ExpenseFields, ExpenseId, create_expense, delete_expense, import_expenses,
            list_expenses, map_expense_row, update_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn get_expense(id: &ExpenseId, connection: &Connection) -> Result<Expense, Error> {
        connection
            .query_row(
                "SELECT id, date, category, description, amount, created_at FROM expense WHERE id = ?1",
                [id.as_str()],
                map_expense_row,
            )
            .map_err(Error::from)
    }

    fn lunch() -> ExpenseFields {
        ExpenseFields {
            date: "2024-01-05".to_owned(),
            category: "Food".to_owned(),
            description: "Lunch".to_owned(),
            amount: 12.5,
        }
    }

    fn fields_on(date: &str, amount: f64) -> ExpenseFields {
        ExpenseFields {
            date: date.to_owned(),
            amount,
            ..lunch()
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let created_at = datetime!(2024-01-05 12:00:00 UTC);

        let expense = create_expense(lunch(), created_at, &conn).unwrap();

        assert_eq!(expense.id, ExpenseId::new("1704456000000"));
        assert_eq!(expense.date, "2024-01-05");
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.created_at, created_at);
    }

    #[test]
    fn create_in_same_millisecond_gets_unique_ids() {
        let conn = get_test_connection();
        let created_at = datetime!(2024-01-05 12:00:00 UTC);

        let first = create_expense(lunch(), created_at, &conn).unwrap();
        let second = create_expense(lunch(), created_at, &conn).unwrap();
        let third = create_expense(lunch(), created_at, &conn).unwrap();

        assert_eq!(first.id, ExpenseId::new("1704456000000"));
        assert_eq!(second.id, ExpenseId::new("1704456000001"));
        assert_eq!(third.id, ExpenseId::new("1704456000002"));
    }

    #[test]
    fn deleted_ids_are_never_issued_again() {
        let conn = get_test_connection();
        create_expense(lunch(), datetime!(2024-01-05 12:00:00 UTC), &conn).unwrap();
        let bumped = create_expense(lunch(), datetime!(2024-01-05 12:00:00 UTC), &conn).unwrap();
        assert_eq!(bumped.id, ExpenseId::new("1704456000001"));
        delete_expense(&bumped.id, &conn).unwrap();

        let next = create_expense(lunch(), datetime!(2024-01-05 12:00:00.001 UTC), &conn).unwrap();

        assert_ne!(next.id, bumped.id);
        assert_eq!(next.id, ExpenseId::new("1704456000002"));
    }

    #[test]
    fn ids_keep_increasing_when_clock_goes_backwards() {
        let conn = get_test_connection();
        let first = create_expense(lunch(), datetime!(2024-01-05 12:00:00 UTC), &conn).unwrap();
        delete_expense(&first.id, &conn).unwrap();

        let second = create_expense(lunch(), datetime!(2024-01-05 11:00:00 UTC), &conn).unwrap();

        assert_eq!(second.id, ExpenseId::new("1704456000001"));
    }

    #[test]
    fn get_missing_expense_is_not_found() {
        let conn = get_test_connection();

        let result = get_expense(&ExpenseId::new("42"), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_is_latest_date_first_then_most_recently_created() {
        let conn = get_test_connection();
        let now = OffsetDateTime::now_utc();
        let old = create_expense(fields_on("2024-01-01", 1.0), now, &conn).unwrap();
        let newest = create_expense(fields_on("2024-03-01", 2.0), now, &conn).unwrap();
        let same_day_first = create_expense(fields_on("2024-02-01", 3.0), now, &conn).unwrap();
        let same_day_second = create_expense(fields_on("2024-02-01", 4.0), now, &conn).unwrap();

        let got = list_expenses(&conn).unwrap();

        assert_eq!(got, vec![newest, same_day_second, same_day_first, old]);
    }

    #[test]
    fn update_replaces_fields_but_keeps_id_and_created_at() {
        let conn = get_test_connection();
        let created = create_expense(lunch(), OffsetDateTime::now_utc(), &conn).unwrap();
        let new_fields = ExpenseFields {
            date: "2024-02-10".to_owned(),
            category: "Transportation".to_owned(),
            description: "Bus pass".to_owned(),
            amount: 40.0,
        };

        let updated = update_expense(&created.id, new_fields, &conn).unwrap();

        assert_eq!(
            updated,
            Expense {
                id: created.id.clone(),
                date: "2024-02-10".to_owned(),
                category: "Transportation".to_owned(),
                description: "Bus pass".to_owned(),
                amount: 40.0,
                created_at: created.created_at,
            }
        );
        assert_eq!(get_expense(&created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_missing_expense_is_not_found() {
        let conn = get_test_connection();

        let result = update_expense(&ExpenseId::new("404"), lunch(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_expense() {
        let conn = get_test_connection();
        let expense = create_expense(lunch(), OffsetDateTime::now_utc(), &conn).unwrap();

        let rows_affected = delete_expense(&expense.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_expense(&expense.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_leaves_collection_unchanged() {
        let conn = get_test_connection();
        let expense = create_expense(lunch(), OffsetDateTime::now_utc(), &conn).unwrap();

        let rows_affected = delete_expense(&ExpenseId::new("does-not-exist"), &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert_eq!(list_expenses(&conn).unwrap(), vec![expense]);
    }

    #[test]
    fn import_keeps_ids_and_skips_existing() {
        let conn = get_test_connection();
        let created_at = datetime!(2023-12-31 09:30:00 UTC);
        let expenses = vec![
            Expense {
                id: ExpenseId::new("65a1b2c3d4e5f6a7b8c9d0e1"),
                date: "2023-12-30".to_owned(),
                category: "Health".to_owned(),
                description: "Pharmacy".to_owned(),
                amount: 8.0,
                created_at,
            },
            Expense {
                id: ExpenseId::new("1704000000000"),
                date: "2023-12-31".to_owned(),
                category: "Food".to_owned(),
                description: "Dinner".to_owned(),
                amount: 30.0,
                created_at,
            },
        ];

        let first_import = import_expenses(&expenses, &conn).unwrap();
        let second_import = import_expenses(&expenses, &conn).unwrap();

        assert_eq!(first_import, 2);
        assert_eq!(second_import, 0);
        let got = list_expenses(&conn).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, ExpenseId::new("1704000000000"));
        assert_eq!(got[1].id, ExpenseId::new("65a1b2c3d4e5f6a7b8c9d0e1"));
    }

    #[test]
    fn created_ids_do_not_clash_with_imported_ids() {
        let conn = get_test_connection();
        let created_at = datetime!(2024-01-05 12:00:00 UTC);
        let imported = Expense {
            id: ExpenseId::new("1704456000000"),
            date: "2024-01-04".to_owned(),
            category: "Other".to_owned(),
            description: "Imported".to_owned(),
            amount: 1.0,
            created_at,
        };
        import_expenses(&[imported], &conn).unwrap();

        let created = create_expense(lunch(), created_at, &conn).unwrap();

        assert_eq!(created.id, ExpenseId::new("1704456000001"));
    }
}
