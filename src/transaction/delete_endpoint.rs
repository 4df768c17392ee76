//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, auth::UserID, database_id::TransactionId, transaction::TransactionState,
};

/// The response body after deleting a transaction.
#[derive(Debug, Serialize)]
pub struct DeletedTransaction {
    /// A human readable confirmation.
    pub message: &'static str,
    /// The ID of the deleted transaction.
    pub id: TransactionId,
}

/// A route handler for deleting a transaction.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if the transaction does not exist
/// or belongs to another user.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<DeletedTransaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user_id, &connection)?;
    tracing::debug!("User {user_id} deleted transaction {transaction_id}");

    Ok(Json(DeletedTransaction {
        message: "Transaction removed",
        id: transaction_id,
    }))
}

/// Delete the transaction `id` owned by `user_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if no such transaction exists.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::DeleteMissingTransaction),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;
        let created: Value = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({"type": "expense", "amount": 80, "date": "2025-01-20"}))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();
        let path = format_endpoint(endpoints::TRANSACTION, id);

        let response = server.delete(&path).add_cookie(cookie.clone()).await;

        response.assert_status_ok();
        response.assert_json(&json!({"message": "Transaction removed", "id": id}));
        server
            .get(&path)
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;
        let created: Value = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({"type": "expense", "amount": 80, "date": "2025-01-20"}))
            .await
            .json();
        let path = format_endpoint(endpoints::TRANSACTION, created["id"].as_i64().unwrap());
        server.delete(&path).add_cookie(cookie.clone()).await;

        let response = server.delete(&path).add_cookie(cookie).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
