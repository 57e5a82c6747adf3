//! Helpers shared by the tests of the route handlers.

use axum::{body::Body, http::Response};
use rusqlite::Connection;

use crate::{
    amount::RawAmount,
    app_state::{SQLAppState, create_app_state},
    expense::ExpenseForm,
};

pub(crate) fn get_test_state() -> SQLAppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    create_app_state(connection).expect("Could not initialize database.")
}

pub(crate) fn expense_form(date: &str, category: &str, description: &str, amount: &str) -> ExpenseForm {
    ExpenseForm {
        date: date.to_owned(),
        category: category.to_owned(),
        description: description.to_owned(),
        amount: Some(RawAmount::Text(amount.to_owned())),
    }
}

pub(crate) async fn body_text(response: Response<Body>) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    String::from_utf8_lossy(&body_bytes).to_string()
}
