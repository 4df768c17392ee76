//! Defines the endpoint for partially updating a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{
        Transaction, TransactionBuilder, TransactionState,
        core::{TRANSACTION_COLUMNS, get_transaction, map_transaction_row, validate_amount},
        form::TransactionPatch,
    },
};

/// A route handler for updating some fields of a transaction.
///
/// Fields missing from the body keep their current values.
///
/// # Errors
/// - [Error::UpdateMissingTransaction] if the transaction does not exist or belongs to another user,
/// - [Error::InvalidTransaction] if the new amount is negative.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let current = match get_transaction(transaction_id, user_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    update_transaction(transaction_id, user_id, patch.apply_to(&current), &connection).map(Json)
}

/// Overwrite the transaction `id` owned by `user_id` with the values in `builder`.
///
/// # Errors
/// - [Error::UpdateMissingTransaction] if the transaction does not exist or belongs to another user,
/// - [Error::InvalidTransaction] if the amount is negative,
/// - [Error::SqlError] for other SQL errors.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\" \
             SET kind = ?1, category = ?2, amount = ?3, date = ?4, note = ?5 \
             WHERE id = ?6 AND user_id = ?7 \
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.kind,
                &builder.category,
                builder.amount.normalize().to_string(),
                builder.date,
                builder.note,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}
