//! Endpoints for reading transactions.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{
        Category, Transaction, TransactionState,
        core::get_transaction,
        query::{TransactionFilter, TransactionQuery, list_categories, list_transactions},
    },
};

/// List the logged in user's transactions, newest first.
///
/// # Errors
/// Returns [Error::InvalidOption] if a filter value cannot be parsed.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter::try_from(query)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    list_transactions(user_id, &filter, &connection).map(Json)
}

/// Get one of the logged in user's transactions.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or belongs to another user.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(transaction_id, user_id, &connection).map(Json)
}

/// List the categories the logged in user has used.
pub async fn get_categories_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    list_categories(user_id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{create_test_transactions, get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn lists_filtered_transactions() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;
        create_test_transactions(&server, &cookie).await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .add_query_param("type", "expense")
            .add_query_param("category", "Food")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let amounts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["amount"].as_str().unwrap())
            .collect();
        assert_eq!(amounts, vec!["80", "250"]);
    }

    #[tokio::test]
    async fn bad_filter_is_bad_request() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_cookie(cookie)
            .add_query_param("dateFrom", "last tuesday")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn gets_single_transaction() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;
        let created: Value = server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({"type": "income", "category": "Gift", "amount": 200, "date": "2025-01-21"}))
            .await
            .json();
        let id = created["id"].as_i64().unwrap();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, id))
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        response.assert_json(&created);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, 999))
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_categories() {
        let server = get_test_server();
        let cookie = register_test_user(&server).await;
        create_test_transactions(&server, &cookie).await;

        let response = server
            .get(endpoints::TRANSACTION_CATEGORIES)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([
            "Entertainment",
            "Food",
            "Freelance",
            "Gift",
            "Salary",
            "Shopping",
            "Transportation"
        ]));
    }
}
