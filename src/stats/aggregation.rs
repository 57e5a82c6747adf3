//! Expense aggregation: totals overall, by category and by month.
//!
//! Everything here is a pure function of the expense list and is recomputed
//! on every request, nothing is persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{budget::Budgets, expense::Expense};

/// The label for the top category when there are no expenses with a positive total.
pub const NO_CATEGORY_LABEL: &str = "None";

/// The month bucket for expenses whose date does not start with `YYYY-MM`.
pub const UNKNOWN_MONTH_LABEL: &str = "Unknown";

/// The total amount spent in a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The sum of amounts in the category.
    pub value: f64,
}

/// The category with the highest total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    /// The category name, or [NO_CATEGORY_LABEL].
    pub name: String,
    /// The total of the category.
    pub amount: f64,
}

/// Derived statistics over a list of expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    /// The sum of all amounts.
    pub total: f64,
    /// Totals per category, in the order each category was first seen.
    pub by_category: Vec<CategoryTotal>,
    /// Totals per `YYYY-MM` month.
    pub by_month: BTreeMap<String, f64>,
    /// The category with the highest total, ties go to the first seen.
    pub top_category: TopCategory,
}

impl ExpenseSummary {
    /// The total for `month` (`YYYY-MM`), zero if nothing was spent that month.
    pub fn month_total(&self, month: &str) -> f64 {
        self.by_month.get(month).copied().unwrap_or(0.0)
    }

    /// The total for `category`, zero if nothing was spent in that category.
    pub fn category_total(&self, category: &str) -> f64 {
        self.by_category
            .iter()
            .find(|total| total.name == category)
            .map_or(0.0, |total| total.value)
    }
}

/// How much of a category's budget has been spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The category the budget applies to.
    pub category: String,
    /// The spending limit.
    pub limit: f64,
    /// The amount spent in the category.
    pub spent: f64,
    /// `limit - spent`, negative when over budget.
    pub remaining: f64,
    /// Whether more than the limit has been spent.
    pub over_budget: bool,
}

/// Compute the total, per-category, per-month and top category statistics.
///
/// Amounts are summed as is. Stored amounts are always finite since
/// invalid amounts are rejected before they reach the store.
pub fn summarize(expenses: &[Expense]) -> ExpenseSummary {
    let total = expenses.iter().map(|expense| expense.amount).sum();
    let by_category = aggregate_by_category(expenses);
    let by_month = aggregate_by_month(expenses);
    let top_category = find_top_category(&by_category);

    ExpenseSummary {
        total,
        by_category,
        by_month,
        top_category,
    }
}

/// Sums amounts per category, keeping categories in first-seen order.
pub fn aggregate_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        match totals
            .iter_mut()
            .find(|total| total.name == expense.category)
        {
            Some(total) => total.value += expense.amount,
            None => totals.push(CategoryTotal {
                name: expense.category.clone(),
                value: expense.amount,
            }),
        }
    }

    totals
}

/// Sums amounts per `YYYY-MM` month of the expense date.
pub fn aggregate_by_month(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let month = month_of(&expense.date).unwrap_or(UNKNOWN_MONTH_LABEL);
        *totals.entry(month.to_owned()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// The leading `YYYY-MM` of `date`, if it has one.
pub fn month_of(date: &str) -> Option<&str> {
    let month = date.get(..7)?;
    let bytes = month.as_bytes();

    let is_month = bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit);

    is_month.then_some(month)
}

/// Finds the category with the highest total.
///
/// Starts from [NO_CATEGORY_LABEL] with an amount of zero and only replaces
/// the running maximum with a strictly greater total.
pub fn find_top_category(by_category: &[CategoryTotal]) -> TopCategory {
    let mut top = TopCategory {
        name: NO_CATEGORY_LABEL.to_owned(),
        amount: 0.0,
    };

    for total in by_category {
        if total.value > top.amount {
            top = TopCategory {
                name: total.name.clone(),
                amount: total.value,
            };
        }
    }

    top
}

/// Compare each budget with what has been spent in its category.
pub fn budget_status(summary: &ExpenseSummary, budgets: &Budgets) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|(category, &limit)| {
            let spent = summary.category_total(category);

            BudgetStatus {
                category: category.clone(),
                limit,
                spent,
                remaining: limit - spent,
                over_budget: spent > limit,
            }
        })
        .collect()
}
