//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{Category, TransactionKind},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who owns the transaction.
    pub user_id: UserID,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The label the transaction is grouped under in breakdowns.
    pub category: Category,
    /// The amount of money spent or earned, never negative.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// An optional free text description.
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, amount: Decimal, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            category: Category::new(None),
            amount,
            date,
            note: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The category defaults to "Other" and the note to none.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::macros::date;
///
/// let builder = Transaction::build(TransactionKind::Expense, dec!(45.99), date!(2025 - 01 - 15))
///     .category("Food")
///     .note(Some("Groceries"));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The category label.
    pub category: Category,
    /// The amount of money, must not be negative.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// An optional free text description.
    pub note: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the note for the transaction. Blank notes are dropped.
    pub fn note(mut self, note: Option<&str>) -> Self {
        self.note = normalize_note(note);
        self
    }
}

/// Trim `note`, mapping blank notes to `None`.
pub(crate) fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|note| !note.is_empty())
        .map(str::to_owned)
}

/// The largest amount a single transaction may have, one trillion.
///
/// Keeps the sum of every transaction a user can store far below [Decimal::MAX].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Check that `amount` is a valid transaction amount.
///
/// # Errors
/// Returns [Error::InvalidTransaction] if the amount is negative or larger than [MAX_AMOUNT].
pub(crate) fn validate_amount(amount: Decimal) -> Result<(), Error> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidTransaction(format!(
            "amount must not be negative, got {amount}"
        )));
    }

    if amount > MAX_AMOUNT {
        return Err(Error::InvalidTransaction(format!(
            "amount must be at most {MAX_AMOUNT}, got {amount}"
        )));
    }

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by every transaction query, in the order [map_transaction_row] reads them.
pub(crate) const TRANSACTION_COLUMNS: &str = "id, user_id, kind, category, amount, date, note";

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransaction] if the amount is negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, kind, category, amount, date, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                builder.kind,
                &builder.category,
                builder.amount.normalize().to_string(),
                builder.date,
                builder.note,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction owned by `user_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id \
             ORDER BY date ASC, id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get the number of transactions owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1;",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                category TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every query is scoped to one user and most are ordered by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [TRANSACTION_COLUMNS] to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let kind = row.get(2)?;
    let category = row.get(3)?;
    let raw_amount: String = row.get(4)?;
    let amount = raw_amount.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let date = row.get(5)?;
    let note = row.get(6)?;

    Ok(Transaction {
        id,
        user_id,
        kind,
        category,
        amount,
        date,
        note,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        transaction::{
            Category, MAX_AMOUNT, Transaction, TransactionKind, count_transactions,
            create_transaction, get_all_transactions,
            core::get_transaction,
        },
    };

    fn get_test_connection() -> (Connection, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user(
            "Test User",
            crate::auth::Email::new("test@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        (conn, user.id)
    }

    #[test]
    fn create_succeeds() {
        let (conn, user_id) = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(TransactionKind::Expense, dec!(12.30), date!(2025 - 01 - 16))
                .category("Food")
                .note(Some("  lunch ")),
            user_id,
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, Category::from("Food"));
        assert_eq!(transaction.amount, dec!(12.3));
        assert_eq!(transaction.date, date!(2025 - 01 - 16));
        assert_eq!(transaction.note.as_deref(), Some("lunch"));
    }

    #[test]
    fn create_keeps_exact_amount() {
        let (conn, user_id) = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(TransactionKind::Income, dec!(0.1), date!(2025 - 01 - 16)),
            user_id,
            &conn,
        )
        .unwrap();
        let got = get_transaction(transaction.id, user_id, &conn).unwrap();

        assert_eq!(got.amount + dec!(0.2), dec!(0.3));
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let (conn, user_id) = get_test_connection();

        let result = create_transaction(
            Transaction::build(TransactionKind::Expense, dec!(-1), date!(2025 - 01 - 16)),
            user_id,
            &conn,
        );

        assert!(matches!(result, Err(Error::InvalidTransaction(_))));
    }

    #[test]
    fn create_fails_on_amount_above_maximum() {
        let (conn, user_id) = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                TransactionKind::Income,
                MAX_AMOUNT + dec!(0.01),
                date!(2025 - 01 - 16),
            ),
            user_id,
            &conn,
        );

        assert!(matches!(result, Err(Error::InvalidTransaction(_))));
    }

    #[test]
    fn create_accepts_maximum_amount() {
        let (conn, user_id) = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(TransactionKind::Income, MAX_AMOUNT, date!(2025 - 01 - 16)),
            user_id,
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount, MAX_AMOUNT);
        assert_eq!(transaction.amount.to_string(), "1000000000000");
    }

    #[test]
    fn create_fails_on_unknown_user() {
        let (conn, _) = get_test_connection();

        let result = create_transaction(
            Transaction::build(TransactionKind::Expense, dec!(1), date!(2025 - 01 - 16)),
            UserID::new(999),
            &conn,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_fails_for_other_users_transaction() {
        let (conn, user_id) = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(TransactionKind::Expense, dec!(1), date!(2025 - 01 - 16)),
            user_id,
            &conn,
        )
        .unwrap();

        let result = get_transaction(transaction.id, UserID::new(user_id.as_i64() + 1), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_all_returns_oldest_first() {
        let (conn, user_id) = get_test_connection();
        for day in [20, 15, 18] {
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    dec!(1),
                    date!(2025 - 01 - 01).replace_day(day).unwrap(),
                ),
                user_id,
                &conn,
            )
            .unwrap();
        }

        let dates: Vec<_> = get_all_transactions(user_id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.date)
            .collect();

        assert_eq!(
            dates,
            vec![date!(2025 - 01 - 15), date!(2025 - 01 - 18), date!(2025 - 01 - 20)]
        );
    }

    #[test]
    fn get_count() {
        let (conn, user_id) = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(TransactionKind::Income, i.into(), date!(2025 - 10 - 05)),
                user_id,
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(user_id, &conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
