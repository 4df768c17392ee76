//! Download the filtered transaction list as CSV.

use axum::{
    Extension,
    extract::{Query, State},
    response::Response,
};

use crate::{
    Error,
    auth::UserID,
    csv_export::{csv_attachment, into_csv_text},
    timezone::today_in,
    transaction::{
        Transaction, TransactionState,
        query::{TransactionFilter, TransactionQuery, list_transactions},
    },
};

/// Write `transactions` as CSV with the header `Date,Type,Category,Amount,Note`.
///
/// # Errors
/// Returns [Error::CsvError] if writing fails.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Type", "Category", "Amount", "Note"])?;

    for transaction in transactions {
        writer.write_record([
            transaction.date.to_string(),
            transaction.kind.to_string(),
            transaction.category.to_string(),
            transaction.amount.to_string(),
            transaction.note.clone().unwrap_or_default(),
        ])?;
    }

    into_csv_text(writer)
}

/// A route handler that downloads the logged in user's transactions as CSV.
///
/// Accepts the same filters as the transaction listing.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<Response, Error> {
    let filter = TransactionFilter::try_from(query)?;
    let today = today_in(&state.local_timezone)?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        list_transactions(user_id, &filter, &connection)?
    };

    let csv_text = transactions_to_csv(&transactions)?;

    Ok(csv_attachment(&format!("transactions-{today}.csv"), csv_text))
}
