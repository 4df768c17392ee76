//! The analytics endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    analytics::{
        AnalyticsSummary, SummaryOptions, TimeRange, TransactionRecord, analytics_report_csv,
        summarize,
    },
    auth::UserID,
    csv_export::csv_attachment,
    timezone::today_in,
    transaction::get_all_transactions,
};

/// The state needed to summarise a user's transactions.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string of the analytics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// A [TimeRange] name, all time if missing or empty.
    #[serde(default, alias = "timeRange")]
    pub time_range: Option<String>,
}

impl AnalyticsQuery {
    fn options(&self) -> Result<SummaryOptions, Error> {
        let time_range = match self.time_range.as_deref().map(str::trim) {
            None | Some("") => TimeRange::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(SummaryOptions { time_range })
    }
}

/// Summarise all of `user_id`'s transactions with `options`, as of `today`.
///
/// The database lock is released before the summary is computed.
pub(crate) fn summarize_user(
    user_id: UserID,
    options: &SummaryOptions,
    today: Date,
    db_connection: &Mutex<Connection>,
) -> Result<AnalyticsSummary, Error> {
    let transactions = {
        let connection = db_connection.lock().map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(user_id, &connection)?
    };

    let records: Vec<TransactionRecord> = transactions.iter().map(TransactionRecord::from).collect();

    Ok(summarize(&records, options, today))
}

/// Get the analytics summary of the logged in user.
///
/// # Errors
/// Returns [Error::InvalidOption] for an unknown `time_range`.
pub async fn get_analytics(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, Error> {
    let options = query.options()?;
    let today = today_in(&state.local_timezone)?;

    summarize_user(user_id, &options, today, &state.db_connection).map(Json)
}

/// Download the analytics summary of the logged in user as a CSV report.
///
/// # Errors
/// Returns [Error::InvalidOption] for an unknown `time_range`.
pub async fn get_analytics_report(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, Error> {
    let options = query.options()?;
    let today = today_in(&state.local_timezone)?;

    let summary = summarize_user(user_id, &options, today, &state.db_connection)?;
    let csv_text = analytics_report_csv(&summary, today)?;

    Ok(csv_attachment(
        &format!("analytics-report-{}-{today}.csv", options.time_range),
        csv_text,
    ))
}
