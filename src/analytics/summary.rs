//! Totals, category breakdowns and monthly trends over a user's transactions.

use std::{collections::BTreeMap, fmt::Display};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use time::Date;

use crate::{
    analytics::{TimeRange, TransactionRecord},
    transaction::{Category, TransactionKind},
};

/// A calendar month, serialized as "YYYY-MM".
///
/// Transactions carry plain dates, so the month of a transaction never
/// depends on a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// The calendar year.
    pub year: i32,
    /// 1 for January through 12 for December.
    pub month: u8,
}

impl MonthKey {
    /// The month `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month().into(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One category's slice of its kind's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category label.
    pub category: Category,
    /// The category's total.
    pub amount: Decimal,
    /// Share of the kind's total in percent, rounded to one decimal place.
    pub percentage: Decimal,
}

/// Income and expenses of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// The month of the bucket.
    pub month: MonthKey,
    /// Total income in the month.
    pub income: Decimal,
    /// Total expenses in the month.
    pub expense: Decimal,
    /// `income - expense`.
    pub net: Decimal,
}

/// The options accepted by [summarize].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Only transactions in this window are summarised.
    pub time_range: TimeRange,
}

/// The result of [summarize].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// The window the summary covers.
    pub time_range: TimeRange,
    /// The sum of all counted income.
    pub total_income: Decimal,
    /// The sum of all counted expenses.
    pub total_expenses: Decimal,
    /// Always `total_income - total_expenses`.
    pub net_balance: Decimal,
    /// Expense categories, largest first, ties by label.
    pub expense_breakdown: Vec<CategoryShare>,
    /// Income categories, largest first, ties by label.
    pub income_breakdown: Vec<CategoryShare>,
    /// One bucket per month with at least one counted transaction, oldest first.
    pub monthly_trend: Vec<MonthlyBucket>,
    /// The number of transactions included in the totals.
    pub transaction_count: usize,
    /// The number of records left out, malformed or too large to add.
    pub skipped: usize,
}

#[derive(Default)]
struct MonthTotals {
    income: Decimal,
    expense: Decimal,
}

/// Summarise `records` over the window `options.time_range` ending on `today`.
///
/// Malformed records are skipped and counted in [AnalyticsSummary::skipped],
/// no matter their date. Amounts are summed exactly; the only rounding is
/// in the breakdown percentages. A record whose amount would push its
/// kind's total past [Decimal::MAX] is skipped and counted too.
///
/// The result depends only on the arguments, so calling this twice with the
/// same input gives the same output.
pub fn summarize(
    records: &[TransactionRecord],
    options: &SummaryOptions,
    today: Date,
) -> AnalyticsSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut income_by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    let mut expense_by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    let mut by_month: BTreeMap<MonthKey, MonthTotals> = BTreeMap::new();
    let mut transaction_count = 0;
    let mut skipped = 0;

    for record in records {
        let record = match record.validate() {
            Ok(record) => record,
            Err(reason) => {
                tracing::debug!("Skipping transaction record {record:?}: {reason}");
                skipped += 1;
                continue;
            }
        };

        if !options.time_range.contains(record.date, today) {
            continue;
        }

        let total = match record.kind {
            TransactionKind::Income => &mut total_income,
            TransactionKind::Expense => &mut total_expenses,
        };
        // Category and month sums never exceed the kind's total, so they cannot overflow if it doesn't.
        let Some(new_total) = total.checked_add(record.amount) else {
            tracing::warn!(
                "Skipping transaction record of {} on {}: total would overflow",
                record.amount,
                record.date
            );
            skipped += 1;
            continue;
        };
        *total = new_total;

        transaction_count += 1;
        let month = by_month.entry(MonthKey::from_date(record.date)).or_default();

        match record.kind {
            TransactionKind::Income => {
                month.income += record.amount;
                *income_by_category.entry(record.category).or_default() += record.amount;
            }
            TransactionKind::Expense => {
                month.expense += record.amount;
                *expense_by_category.entry(record.category).or_default() += record.amount;
            }
        }
    }

    if skipped > 0 {
        tracing::info!("Skipped {skipped} transaction records");
    }

    AnalyticsSummary {
        time_range: options.time_range,
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
        expense_breakdown: breakdown(expense_by_category, total_expenses),
        income_breakdown: breakdown(income_by_category, total_income),
        monthly_trend: by_month
            .into_iter()
            .map(|(month, totals)| MonthlyBucket {
                month,
                income: totals.income,
                expense: totals.expense,
                net: totals.income - totals.expense,
            })
            .collect(),
        transaction_count,
        skipped,
    }
}

fn breakdown(by_category: BTreeMap<Category, Decimal>, total: Decimal) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: percentage_of(amount, total),
        })
        .collect();

    // BTreeMap iteration already orders by label, the stable sort keeps that for ties.
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));

    shares
}

/// `part / total` in percent, rounded half away from zero to one decimal place.
fn percentage_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }

    (part / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
