//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The backing database could not be read or written.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients receive a generic internal server error instead.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The requested expense was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Expense not found")]
    NotFound,

    /// A field in the request could not be coerced into the expected type,
    /// e.g. an amount that is not a finite number.
    #[error("{0}")]
    ValidationFailure(String),

    /// The request body was not valid JSON or was missing required fields.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A file in the flat-file layout could not be read or parsed.
    #[error("could not read legacy file: {0}")]
    InvalidLegacyFile(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::StorageUnavailable(error.to_string())
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::ValidationFailure(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Error::InvalidRequestBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
