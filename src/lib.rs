//! An expense tracker for recording personal spending.
//!
//! This library provides a JSON REST API for recording expenses and
//! per-category budgets. It also serves statistics aggregated over every
//! expense and a CSV export for spreadsheets.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod amount;
mod app_state;
mod csv_export;
mod db;
mod error;
mod logging;
mod routing;

pub mod budget;
pub mod endpoints;
pub mod expense;
pub mod legacy;
pub mod stats;
pub mod stores;

#[cfg(test)]
mod test_utils;

pub use amount::RawAmount;
pub use app_state::{AppState, SQLAppState, create_app_state};
pub use csv_export::expenses_to_csv;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Expense, ExpenseFields, ExpenseId};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
