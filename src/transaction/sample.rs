//! A small, realistic set of transactions for demos and tests.

use rust_decimal::Decimal;
use time::macros::date;

use crate::transaction::{Transaction, TransactionBuilder, TransactionKind};

/// Eight transactions from January 2025: three incomes and five expenses.
pub fn sample_transactions() -> Vec<TransactionBuilder> {
    use TransactionKind::{Expense, Income};

    [
        (Income, "Salary", 5000, date!(2025 - 01 - 15), "Monthly salary"),
        (Expense, "Food", 250, date!(2025 - 01 - 16), "Groceries"),
        (Expense, "Transportation", 50, date!(2025 - 01 - 17), "Bus fare"),
        (Income, "Freelance", 800, date!(2025 - 01 - 18), "Website project"),
        (Expense, "Entertainment", 120, date!(2025 - 01 - 19), "Movie tickets"),
        (Expense, "Food", 80, date!(2025 - 01 - 20), "Restaurant dinner"),
        (Income, "Gift", 200, date!(2025 - 01 - 21), "Birthday gift"),
        (Expense, "Shopping", 300, date!(2025 - 01 - 22), "Clothes"),
    ]
    .into_iter()
    .map(|(kind, category, amount, date, note)| {
        Transaction::build(kind, Decimal::from(amount), date)
            .category(category)
            .note(Some(note))
    })
    .collect()
}
