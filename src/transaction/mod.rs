//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The JSON endpoints for transaction CRUD and CSV export

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod form;
mod get_endpoint;
mod kind;
mod query;
mod sample;

pub use category::Category;
pub use core::{
    MAX_AMOUNT, Transaction, TransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, get_all_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export_endpoint::export_transactions_endpoint;
pub use get_endpoint::{
    get_categories_endpoint, get_transaction_endpoint, get_transactions_endpoint,
};
pub use kind::TransactionKind;
pub use query::{TransactionFilter, list_transactions};
pub use sample::sample_transactions;

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
