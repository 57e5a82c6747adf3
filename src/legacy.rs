//! Import of the flat-file layout used by earlier versions of the app.
//!
//! The flat-file layout is two JSON files: an array of expenses, newest
//! first, and an object mapping each category to its budget. Expenses
//! exported from the document store are also accepted. These have an `_id`,
//! may use `title` instead of `description` and may wrap values in extended
//! JSON such as `{"$date": ...}` or `{"$numberDouble": ...}`.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    amount::{RawAmount, coerce_amount},
    budget::Budgets,
    expense::{Expense, ExpenseId},
    stores::Store,
};

/// Extended JSON wrappers whose inner value is used as is.
const EXTENDED_JSON_WRAPPERS: [&str; 5] = [
    "$oid",
    "$numberDouble",
    "$numberInt",
    "$numberLong",
    "$numberDecimal",
];

/// An expense as written by the flat-file or document store backends.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyExpense {
    /// A string or number ID.
    #[serde(default, alias = "_id")]
    pub id: Value,
    /// When the expense happened.
    #[serde(default)]
    pub date: String,
    /// The category of the expense.
    #[serde(default)]
    pub category: String,
    /// A text description of the expense.
    #[serde(default, alias = "title")]
    pub description: String,
    /// The amount, `null` if the old backend stored NaN.
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// When the document was created, only present for the document store.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl LegacyExpense {
    /// Read one record of the legacy expense array, unwrapping extended JSON.
    ///
    /// # Errors
    /// Returns a [serde_json::Error] if a field has a type no backend wrote,
    /// e.g. a `date` that is an array.
    pub fn from_value(record: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(unwrap_extended_json(record))
    }
}

/// How many records a legacy import read and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// The number of records in the legacy expense file.
    pub expenses_read: usize,
    /// The number of expenses inserted, invalid records and expenses with
    /// existing IDs are skipped.
    pub expenses_imported: usize,
    /// The number of budgets written.
    pub budgets_imported: usize,
}

/// Parse the JSON array of legacy expense records.
///
/// The records are checked one at a time by [convert_legacy_expenses].
///
/// # Errors
/// Returns an [Error::InvalidLegacyFile] if `text` is not a JSON array.
pub fn parse_legacy_records(text: &str) -> Result<Vec<Value>, Error> {
    serde_json::from_str(text).map_err(|error| Error::InvalidLegacyFile(error.to_string()))
}

/// Parse the JSON object of legacy budgets.
///
/// Budgets whose amount is not a finite number are skipped.
///
/// # Errors
/// Returns an [Error::InvalidLegacyFile] if `text` is not a JSON object.
pub fn parse_legacy_budgets(text: &str) -> Result<Budgets, Error> {
    let raw_budgets = serde_json::from_str::<Map<String, Value>>(text)
        .map_err(|error| Error::InvalidLegacyFile(error.to_string()))?;

    let mut budgets = Budgets::new();

    for (category, amount) in raw_budgets {
        let raw_amount: Option<RawAmount> =
            serde_json::from_value(unwrap_extended_json(amount)).unwrap_or(None);

        match coerce_amount(raw_amount.as_ref()) {
            Ok(amount) => {
                budgets.insert(category, amount);
            }
            Err(error) => tracing::warn!("Skipping budget for {category}: {error}"),
        }
    }

    Ok(budgets)
}

/// Convert legacy expense records into expenses ready for [Store::import_expenses].
///
/// The result is ordered oldest first: the input is assumed to be newest
/// first, as the flat-file backend prepended new expenses. Records that do
/// not have the shape of an expense are skipped, as are records without an
/// ID or with an amount that is not a finite number.
///
/// The creation time is taken from `created_at` if present, then from IDs
/// that are millisecond timestamps, and otherwise falls back to `imported_at`.
pub fn convert_legacy_expenses(records: Vec<Value>, imported_at: OffsetDateTime) -> Vec<Expense> {
    records
        .into_iter()
        .rev()
        .filter_map(|record| {
            let record = match LegacyExpense::from_value(record) {
                Ok(record) => record,
                Err(error) => {
                    tracing::warn!("Skipping malformed expense record: {error}");
                    return None;
                }
            };

            let Some(id) = legacy_id(&record.id) else {
                tracing::warn!("Skipping expense without an ID: {record:?}");
                return None;
            };

            let amount = match coerce_amount(record.amount.as_ref()) {
                Ok(amount) => amount,
                Err(error) => {
                    tracing::warn!("Skipping expense {id}: {error}");
                    return None;
                }
            };

            let created_at = record
                .created_at
                .as_deref()
                .and_then(|text| OffsetDateTime::parse(text, &Rfc3339).ok())
                .or_else(|| timestamp_from_id(&id))
                .unwrap_or(imported_at);

            Some(Expense {
                id: ExpenseId::new(id),
                date: record.date,
                category: record.category,
                description: record.description,
                amount,
                created_at,
            })
        })
        .collect()
}

/// Read the legacy files and store their contents in `store`.
///
/// # Errors
/// Returns an [Error::InvalidLegacyFile] if a file cannot be read or is not
/// the expected kind of JSON value, or an [Error::StorageUnavailable] if the
/// store cannot be written.
pub fn import_legacy_files<S: Store>(
    store: &S,
    expenses_path: &Path,
    budgets_path: Option<&Path>,
) -> Result<ImportSummary, Error> {
    let records = parse_legacy_records(&read_file(expenses_path)?)?;
    let expenses_read = records.len();
    let expenses = convert_legacy_expenses(records, OffsetDateTime::now_utc());
    let expenses_imported = store.import_expenses(&expenses)?;

    let mut budgets_imported = 0;
    if let Some(budgets_path) = budgets_path {
        for (category, amount) in parse_legacy_budgets(&read_file(budgets_path)?)? {
            store.set_budget(&category, amount)?;
            budgets_imported += 1;
        }
    }

    Ok(ImportSummary {
        expenses_read,
        expenses_imported,
        budgets_imported,
    })
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path)
        .map_err(|error| Error::InvalidLegacyFile(format!("{}: {error}", path.display())))
}

/// Replace extended JSON wrappers with plain JSON values.
///
/// Numbers wrapped as `{"$numberDouble": "12.5"}` become strings, which the
/// amount coercion accepts. Dates become RFC 3339 strings.
fn unwrap_extended_json(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_extended_json).collect()),
        Value::Object(object) => {
            let mut object: Map<String, Value> = object
                .into_iter()
                .map(|(key, value)| (key, unwrap_extended_json(value)))
                .collect();

            if object.len() == 1 {
                if let Some(inner) = EXTENDED_JSON_WRAPPERS
                    .iter()
                    .find_map(|wrapper| object.remove(*wrapper))
                {
                    return inner;
                }

                if let Some(date) = object.remove("$date") {
                    return unwrap_date(date);
                }
            }

            Value::Object(object)
        }
        value => value,
    }
}

/// A `$date` is either an ISO 8601 string or milliseconds since the Unix epoch.
fn unwrap_date(date: Value) -> Value {
    let millis = match &date {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse::<i64>().ok(),
        _ => None,
    };

    millis
        .and_then(|millis| {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        })
        .and_then(|date_time| date_time.format(&Rfc3339).ok())
        .map(Value::String)
        .unwrap_or(date)
}

fn legacy_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn timestamp_from_id(id: &str) -> Option<OffsetDateTime> {
    let millis: i128 = id.parse().ok()?;

    OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000).ok()
}
