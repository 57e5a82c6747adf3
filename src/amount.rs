//! Coercion of request amounts into finite numbers.

use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// The raw amount as sent by a client, either a JSON number or a string
/// such as `"12.50"` straight from an HTML number input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON number.
    Number(f64),
    /// A string that should contain a decimal number.
    Text(String),
    /// Any other JSON value, e.g. `true` or an object, which is never a valid amount.
    Other(Value),
}

impl RawAmount {
    /// Coerce the raw amount into a finite `f64`.
    ///
    /// Leading and trailing whitespace is ignored for strings.
    ///
    /// # Errors
    /// Returns [Error::ValidationFailure] if the amount is not a number or a
    /// decimal string, or the number is NaN or infinite.
    pub fn coerce(&self) -> Result<f64, Error> {
        let amount = match self {
            RawAmount::Number(number) => *number,
            RawAmount::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                Error::ValidationFailure(format!("amount \"{text}\" is not a number"))
            })?,
            RawAmount::Other(value) => {
                return Err(Error::ValidationFailure(format!(
                    "amount {value} is not a number"
                )));
            }
        };

        if amount.is_finite() {
            Ok(amount)
        } else {
            Err(Error::ValidationFailure(format!(
                "amount {amount} is not a finite number"
            )))
        }
    }
}

/// Coerce an optional raw amount, treating a missing amount as invalid.
///
/// # Errors
/// Returns [Error::ValidationFailure] if the amount is missing or invalid.
pub fn coerce_amount(raw: Option<&RawAmount>) -> Result<f64, Error> {
    match raw {
        Some(raw) => raw.coerce(),
        None => Err(Error::ValidationFailure("amount is required".to_owned())),
    }
}
