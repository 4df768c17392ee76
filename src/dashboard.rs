//! The dashboard overview: all-time totals, the latest transactions, the
//! recent monthly trend and the largest expense categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    AppState, Error,
    analytics::{CategoryShare, MonthlyBucket, SummaryOptions, summarize_user},
    auth::UserID,
    timezone::today_in,
    transaction::{Transaction, TransactionFilter, list_transactions},
};

/// How many of the newest transactions the dashboard lists.
const RECENT_TRANSACTION_COUNT: u32 = 5;
/// How many of the most recent months the trend covers.
const TREND_MONTH_COUNT: usize = 6;
/// How many expense categories the dashboard shows.
const TOP_CATEGORY_COUNT: usize = 5;

/// The state needed to build the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The dashboard data of one user.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub transaction_count: usize,
    /// The newest transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
    /// The last months with transactions, oldest first.
    pub monthly_trend: Vec<MonthlyBucket>,
    /// The largest expense categories of all time.
    pub top_expense_categories: Vec<CategoryShare>,
}

/// Get the dashboard of the logged in user.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Dashboard>, Error> {
    let today = today_in(&state.local_timezone)?;
    let summary = summarize_user(user_id, &SummaryOptions::default(), today, &state.db_connection)?;

    let recent_transactions = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        list_transactions(
            user_id,
            &TransactionFilter {
                limit: Some(RECENT_TRANSACTION_COUNT),
                ..Default::default()
            },
            &connection,
        )?
    };

    let mut monthly_trend = summary.monthly_trend;
    let first_shown = monthly_trend.len().saturating_sub(TREND_MONTH_COUNT);
    let monthly_trend = monthly_trend.split_off(first_shown);

    let mut top_expense_categories = summary.expense_breakdown;
    top_expense_categories.truncate(TOP_CATEGORY_COUNT);

    Ok(Json(Dashboard {
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        net_balance: summary.net_balance,
        transaction_count: summary.transaction_count,
        recent_transactions,
        monthly_trend,
        top_expense_categories,
    }))
}
