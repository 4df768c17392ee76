//! Renders an [AnalyticsSummary] as a downloadable CSV report.

use time::Date;

use crate::{
    Error,
    analytics::{AnalyticsSummary, CategoryShare},
    csv_export::into_csv_text,
};

/// Write `summary` as a CSV report generated on `today`.
///
/// The report has a summary section followed by the expense categories,
/// the income categories and the monthly trend. Section titles are rows with
/// a single field, so rows have different lengths.
///
/// # Errors
/// Returns [Error::CsvError] if writing fails.
pub fn analytics_report_csv(summary: &AnalyticsSummary, today: Date) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Pocket Money Analytics Report"])?;
    writer.write_record(["Generated", today.to_string().as_str()])?;
    writer.write_record(["Time Range", summary.time_range.as_str()])?;

    writer.write_record(["Summary"])?;
    writer.write_record(["Total Income", summary.total_income.to_string().as_str()])?;
    writer.write_record(["Total Expenses", summary.total_expenses.to_string().as_str()])?;
    writer.write_record(["Net Balance", summary.net_balance.to_string().as_str()])?;
    writer.write_record(["Transactions", summary.transaction_count.to_string().as_str()])?;
    writer.write_record(["Skipped Records", summary.skipped.to_string().as_str()])?;

    write_breakdown(&mut writer, "Expense Categories", &summary.expense_breakdown)?;
    write_breakdown(&mut writer, "Income Categories", &summary.income_breakdown)?;

    writer.write_record(["Monthly Trend"])?;
    writer.write_record(["Month", "Income", "Expense", "Net"])?;
    for bucket in &summary.monthly_trend {
        writer.write_record([
            bucket.month.to_string(),
            bucket.income.to_string(),
            bucket.expense.to_string(),
            bucket.net.to_string(),
        ])?;
    }

    into_csv_text(writer)
}

fn write_breakdown(
    writer: &mut csv::Writer<Vec<u8>>,
    title: &str,
    shares: &[CategoryShare],
) -> Result<(), Error> {
    writer.write_record([title])?;
    writer.write_record(["Category", "Amount", "Percentage"])?;

    for share in shares {
        writer.write_record([
            share.category.to_string(),
            share.amount.to_string(),
            format!("{:.1}%", share.percentage),
        ])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::analytics::{
        SummaryOptions, TransactionRecord, report::analytics_report_csv, summarize,
    };

    fn record(kind: &str, category: &str, amount: rust_decimal::Decimal) -> TransactionRecord {
        TransactionRecord {
            kind: Some(kind.to_owned()),
            category: Some(category.to_owned()),
            amount: Some(amount),
            date: Some(date!(2025 - 01 - 16)),
        }
    }

    #[test]
    fn writes_all_sections() {
        let records = [
            record("income", "Salary", dec!(5000)),
            record("expense", "Food", dec!(250)),
            record("expense", "Eating, out", dec!(750)),
        ];
        let summary = summarize(&records, &SummaryOptions::default(), date!(2025 - 02 - 01));

        let csv = analytics_report_csv(&summary, date!(2025 - 02 - 01)).unwrap();

        assert_eq!(
            csv,
            "Pocket Money Analytics Report\n\
             Generated,2025-02-01\n\
             Time Range,all-time\n\
             Summary\n\
             Total Income,5000\n\
             Total Expenses,1000\n\
             Net Balance,4000\n\
             Transactions,3\n\
             Skipped Records,0\n\
             Expense Categories\n\
             Category,Amount,Percentage\n\
             \"Eating, out\",750,75.0%\n\
             Food,250,25.0%\n\
             Income Categories\n\
             Category,Amount,Percentage\n\
             Salary,5000,100.0%\n\
             Monthly Trend\n\
             Month,Income,Expense,Net\n\
             2025-01,5000,1000,4000\n"
        );
    }
}
