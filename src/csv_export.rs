//! Formats expenses as CSV text for spreadsheets.

use crate::expense::Expense;

/// The header line of the exported CSV.
pub const CSV_HEADER: &str = "Date,Category,Description,Amount";

/// Format `expenses` as CSV, one line per expense after the header.
///
/// Lines are separated by `\n` and there is no trailing newline. The
/// description is always quoted. The date and category are only quoted if
/// they contain a comma, quote or line break. Quotes inside quoted fields
/// are doubled.
pub fn expenses_to_csv(expenses: &[Expense]) -> String {
    let mut lines = Vec::with_capacity(expenses.len() + 1);
    lines.push(CSV_HEADER.to_owned());

    for expense in expenses {
        lines.push(format!(
            "{},{},{},{}",
            escape_if_needed(&expense.date),
            escape_if_needed(&expense.category),
            quote(&expense.description),
            expense.amount
        ));
    }

    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn escape_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use crate::{
        csv_export::expenses_to_csv,
        expense::{Expense, ExpenseId},
    };

    fn expense(date: &str, category: &str, description: &str, amount: f64) -> Expense {
        Expense {
            id: ExpenseId::new("1"),
            date: date.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            amount,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn exports_single_expense() {
        let expenses = vec![expense("2024-01-05", "Food", "Lunch", 12.5)];

        let csv = expenses_to_csv(&expenses);

        assert_eq!(
            csv,
            "Date,Category,Description,Amount\n2024-01-05,Food,\"Lunch\",12.5"
        );
    }

    #[test]
    fn exports_only_header_when_empty() {
        assert_eq!(expenses_to_csv(&[]), "Date,Category,Description,Amount");
    }

    #[test]
    fn whole_amounts_have_no_decimal_point() {
        let expenses = vec![expense("2024-01-01", "Housing", "Rent", 900.0)];

        let csv = expenses_to_csv(&expenses);

        assert!(csv.ends_with("2024-01-01,Housing,\"Rent\",900"), "{csv}");
    }

    #[test]
    fn quotes_are_doubled() {
        let expenses = vec![expense(
            "2024-01-05",
            "Food, Drink",
            "The \"good\" coffee",
            4.5,
        )];

        let csv = expenses_to_csv(&expenses);

        assert_eq!(
            csv.lines().nth(1),
            Some("2024-01-05,\"Food, Drink\",\"The \"\"good\"\" coffee\",4.5")
        );
    }
}
