//! Helpers shared by the endpoint tests.

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, auth::COOKIE_TOKEN, build_router, cors::AllowedOrigins, endpoints,
    timezone::DEFAULT_TIMEZONE, transaction::sample_transactions,
};

pub(crate) const TEST_NAME: &str = "Test User";
pub(crate) const TEST_EMAIL: &str = "test@example.com";
pub(crate) const TEST_PASSWORD: &str = "pickled-radish-umbrella-42";

/// A server backed by a fresh in-memory database.
///
/// Uses the lowest bcrypt cost so registering users does not slow the tests down.
#[track_caller]
pub(crate) fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let mut state = AppState::new(
        connection,
        "42",
        DEFAULT_TIMEZONE,
        AllowedOrigins::default(),
    )
    .expect("Could not create app state");
    state.password_cost = 4;

    TestServer::try_new(build_router(state)).expect("Could not create test server")
}

/// Register [TEST_EMAIL] and return the auth cookie from the response.
pub(crate) async fn register_test_user(server: &TestServer) -> Cookie<'static> {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "name": TEST_NAME,
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.cookie(COOKIE_TOKEN)
}

/// Add the sample transactions for the user logged in with `cookie`.
pub(crate) async fn create_test_transactions(server: &TestServer, cookie: &Cookie<'static>) {
    for transaction in sample_transactions() {
        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "type": transaction.kind,
                "category": transaction.category,
                "amount": transaction.amount,
                "date": transaction.date.to_string(),
                "note": transaction.note,
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
}
