//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    AppState, Error,
    analytics::{get_analytics, get_analytics_report},
    auth::{Message, auth_guard, get_current_user, post_log_in, post_log_out, register_user},
    dashboard::get_dashboard,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_transactions_endpoint, get_categories_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_health))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::CURRENT_USER, get(get_current_user))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .patch(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_CATEGORIES,
            get(get_categories_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(endpoints::ANALYTICS, get(get_analytics))
        .route(endpoints::ANALYTICS_REPORT, get(get_analytics_report))
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let cors_layer = state.allowed_origins.clone().into_layer();

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
        .layer(cors_layer)
}

/// Let clients and uptime checks know the server is up.
async fn get_health() -> Json<Message> {
    Json(Message {
        message: "Pocket Money Manager API is running",
    })
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> (StatusCode, &'static str) {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot")
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
