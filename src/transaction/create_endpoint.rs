//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    transaction::{Transaction, TransactionState, core::create_transaction, form::TransactionForm},
};

/// A route handler for creating a new transaction for the logged in user.
///
/// Responds with `201 Created` and the stored transaction.
///
/// # Errors
/// Returns [Error::InvalidTransaction] if the amount is negative or too large.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(form.into(), user_id, &connection)?;
    tracing::debug!("User {user_id} created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}
