use std::{path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{create_app_state, legacy::import_legacy_files};

/// A utility for loading the JSON files of the flat-file backend into the
/// SQLite database of the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database, created if it does not exist.
    #[arg(long, env = "EXPENSE_DB_PATH", default_value = "expenses.db")]
    db_path: String,

    /// File path to the JSON array of expenses.
    #[arg(long)]
    expenses: PathBuf,

    /// File path to the JSON object of budgets.
    #[arg(long)]
    budgets: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();

    let args = Args::parse();

    if !args.expenses.is_file() {
        tracing::error!("No file exists at {:#?}", args.expenses);
        exit(1);
    }

    let app_state = match Connection::open(&args.db_path)
        .map_err(expense_tracker::Error::from)
        .and_then(create_app_state)
    {
        Ok(app_state) => app_state,
        Err(error) => {
            tracing::error!("Could not open the database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    tracing::info!("Importing {:#?} into {}", args.expenses, args.db_path);

    match import_legacy_files(&app_state.store, &args.expenses, args.budgets.as_deref()) {
        Ok(summary) => tracing::info!(
            "Imported {} of {} expenses and {} budgets",
            summary.expenses_imported,
            summary.expenses_read,
            summary.budgets_imported
        ),
        Err(error) => {
            tracing::error!("Import failed: {error}");
            exit(1);
        }
    }
}
