//! The paths of the REST API.
//!
//! Parameterised paths use axum's `{name}` syntax, use [format_endpoint] to
//! fill them in.

pub const ROOT: &str = "/";
pub const COFFEE: &str = "/api/coffee";

pub const REGISTER: &str = "/api/users/register";
pub const LOG_IN: &str = "/api/users/login";
pub const LOG_OUT: &str = "/api/users/logout";
pub const CURRENT_USER: &str = "/api/users/me";

pub const TRANSACTIONS: &str = "/api/transactions";
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
pub const TRANSACTION_CATEGORIES: &str = "/api/transactions/categories";
pub const TRANSACTIONS_EXPORT: &str = "/api/transactions/export";

pub const ANALYTICS: &str = "/api/analytics";
pub const ANALYTICS_REPORT: &str = "/api/analytics/report";

pub const DASHBOARD: &str = "/api/dashboard";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Parameters are the `{name}` placeholders used by axum routes. If there is
/// no parameter the path is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!(
                "{}{}{}",
                &endpoint_path[..start],
                id,
                &endpoint_path[end + 1..]
            )
        }
        _ => endpoint_path.to_owned(),
    }
}
