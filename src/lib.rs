//! Pocket Money is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions, filtering and exporting them, and summarizing them into
//! category breakdowns and monthly trends.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod analytics;
mod app_state;
mod auth;
mod cors;
mod csv_export;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use analytics::{
    AnalyticsSummary, CategoryShare, MonthKey, MonthlyBucket, SkipReason, SummaryOptions,
    TimeRange, TransactionRecord, ValidRecord, summarize,
};
pub use app_state::AppState;
pub use auth::{
    Email, PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    update_password,
};
pub use cors::AllowedOrigins;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::DEFAULT_TIMEZONE;
pub use transaction::{
    Category, MAX_AMOUNT, Transaction, TransactionBuilder, TransactionKind, count_transactions,
    create_transaction, sample_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
