//! Defines the endpoint for downloading expenses as a CSV file.
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, csv_export::expenses_to_csv, stores::Store};

/// The file name suggested to the browser for the download.
pub const EXPORT_FILE_NAME: &str = "expenses.csv";

/// A route handler that responds with every expense as a CSV attachment.
pub async fn export_expenses_endpoint<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Response, Error> {
    let expenses = state.store.list_expenses()?;
    let csv = expenses_to_csv(&expenses);

    Ok((
        [
            (CONTENT_TYPE, "text/csv;charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
