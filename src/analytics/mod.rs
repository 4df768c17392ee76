//! Aggregates a user's transactions into totals, category breakdowns and a
//! monthly trend.
//!
//! [summarize] is a pure function: it takes the records, the options and the
//! reference date explicitly and never touches the database or the clock.
//! The endpoints do the I/O around it.

mod endpoint;
mod record;
mod report;
mod summary;
mod time_range;

pub use endpoint::{get_analytics, get_analytics_report};
pub(crate) use endpoint::summarize_user;
pub use record::{SkipReason, TransactionRecord, ValidRecord};
pub use report::analytics_report_csv;
pub use summary::{
    AnalyticsSummary, CategoryShare, MonthKey, MonthlyBucket, SummaryOptions, summarize,
};
pub use time_range::TimeRange;
