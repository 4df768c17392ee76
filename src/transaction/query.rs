//! Filtered transaction listings.

use rusqlite::{Connection, ToSql};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    transaction::{
        Category, Transaction, TransactionKind,
        core::{TRANSACTION_COLUMNS, map_transaction_row},
        form::parse_date,
    },
};

/// Criteria for narrowing down a listing of one user's transactions.
///
/// Every criterion is optional and they are combined with AND.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the category or the note.
    pub search: Option<String>,
    /// Only transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only transactions with exactly this category.
    pub category: Option<Category>,
    /// Only transactions on or after this date.
    pub date_from: Option<Date>,
    /// Only transactions on or before this date.
    pub date_to: Option<Date>,
    /// Return at most this many transactions.
    pub limit: Option<u32>,
}

/// The raw query string of a transaction listing.
///
/// Empty values and "all" mean "no filter", matching what web forms send.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    search: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    category: Option<String>,
    #[serde(alias = "dateFrom")]
    date_from: Option<String>,
    #[serde(alias = "dateTo")]
    date_to: Option<String>,
    limit: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(query: TransactionQuery) -> Result<Self, Self::Error> {
        let parse_option_date = |raw: Option<String>, name: &str| {
            non_empty(raw)
                .map(|raw| {
                    parse_date(&raw)
                        .map_err(|_| Error::InvalidOption(format!("{name} \"{raw}\" is not a date")))
                })
                .transpose()
        };

        let kind = non_empty(query.kind)
            .map(|raw| {
                raw.parse::<TransactionKind>()
                    .map_err(|_| Error::InvalidOption(format!("unknown transaction type \"{raw}\"")))
            })
            .transpose()?;

        let limit = non_empty(query.limit)
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| Error::InvalidOption(format!("limit \"{raw}\" is not a number")))
            })
            .transpose()?;

        Ok(Self {
            search: query
                .search
                .map(|search| search.trim().to_owned())
                .filter(|search| !search.is_empty()),
            kind,
            category: non_empty(query.category).map(|raw| Category::new(Some(&raw))),
            date_from: parse_option_date(query.date_from, "date_from")?,
            date_to: parse_option_date(query.date_to, "date_to")?,
            limit,
        })
    }
}

/// Escape the LIKE wildcards in `text` using `\` as the escape character.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Get the transactions of `user_id` matching `filter`, newest first.
///
/// Transactions on the same date are ordered by ID, newest first, so the
/// order is stable after edits.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut clauses = vec!["user_id = ?"];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.as_i64())];

    if let Some(search) = &filter.search {
        // SQLite's LIKE is case-insensitive for ASCII characters.
        clauses.push("(category LIKE ? ESCAPE '\\' OR note LIKE ? ESCAPE '\\')");
        let pattern = format!("%{}%", escape_like(search));
        params.push(Box::new(pattern.clone()));
        params.push(Box::new(pattern));
    }
    if let Some(kind) = filter.kind {
        clauses.push("kind = ?");
        params.push(Box::new(kind));
    }
    if let Some(category) = &filter.category {
        clauses.push("category = ?");
        params.push(Box::new(category.clone()));
    }
    if let Some(date_from) = filter.date_from {
        clauses.push("date >= ?");
        params.push(Box::new(date_from));
    }
    if let Some(date_to) = filter.date_to {
        clauses.push("date <= ?");
        params.push(Box::new(date_to));
    }

    let mut query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY date DESC, id DESC",
        clauses.join(" AND ")
    );
    if let Some(limit) = filter.limit {
        query.push_str(" LIMIT ?");
        params.push(Box::new(limit));
    }

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|param| param.as_ref()).collect();

    connection
        .prepare(&query)?
        .query_map(param_refs.as_slice(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get the distinct categories used by `user_id`, in ascending order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT category FROM \"transaction\" WHERE user_id = ?1 ORDER BY category ASC",
        )?
        .query_map([user_id.as_i64()], |row| row.get(0))?
        .map(|category_result| category_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        auth::{Email, PasswordHash, UserID, create_user},
        db::initialize,
        transaction::{
            Category, Transaction, TransactionKind, create_transaction,
            query::{TransactionFilter, TransactionQuery, list_categories, list_transactions},
        },
    };

    fn get_test_connection() -> (Connection, UserID) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user(
            "Test User",
            Email::new("test@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &conn,
        )
        .unwrap();

        let samples = [
            (TransactionKind::Income, "Salary", dec!(5000), date!(2025 - 01 - 15), None),
            (TransactionKind::Expense, "Food", dec!(250), date!(2025 - 01 - 16), Some("Groceries")),
            (TransactionKind::Expense, "Transportation", dec!(50), date!(2025 - 01 - 17), Some("Bus pass")),
            (TransactionKind::Expense, "Food", dec!(80), date!(2025 - 01 - 20), Some("100% beef_burger")),
        ];
        for (kind, category, amount, date, note) in samples {
            create_transaction(
                Transaction::build(kind, amount, date).category(category).note(note),
                user.id,
                &conn,
            )
            .unwrap();
        }

        (conn, user.id)
    }

    fn amounts(transactions: &[Transaction]) -> Vec<rust_decimal::Decimal> {
        transactions.iter().map(|transaction| transaction.amount).collect()
    }

    #[test]
    fn no_filter_lists_everything_newest_first() {
        let (conn, user_id) = get_test_connection();

        let got = list_transactions(user_id, &TransactionFilter::default(), &conn).unwrap();

        assert_eq!(amounts(&got), vec![dec!(80), dec!(50), dec!(250), dec!(5000)]);
    }

    #[test]
    fn search_matches_category_or_note_ignoring_case() {
        let (conn, user_id) = get_test_connection();
        let filter = TransactionFilter {
            search: Some("GROC".to_owned()),
            ..Default::default()
        };

        let got = list_transactions(user_id, &filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![dec!(250)]);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let (conn, user_id) = get_test_connection();
        let filter = TransactionFilter {
            search: Some("100%".to_owned()),
            ..Default::default()
        };

        let got = list_transactions(user_id, &filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![dec!(80)]);
    }

    #[test]
    fn filters_combine() {
        let (conn, user_id) = get_test_connection();
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            category: Some(Category::from("Food")),
            date_from: Some(date!(2025 - 01 - 16)),
            date_to: Some(date!(2025 - 01 - 19)),
            ..Default::default()
        };

        let got = list_transactions(user_id, &filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![dec!(250)]);
    }

    #[test]
    fn limit_caps_result() {
        let (conn, user_id) = get_test_connection();
        let filter = TransactionFilter {
            limit: Some(2),
            ..Default::default()
        };

        let got = list_transactions(user_id, &filter, &conn).unwrap();

        assert_eq!(amounts(&got), vec![dec!(80), dec!(50)]);
    }

    #[test]
    fn other_users_see_nothing() {
        let (conn, user_id) = get_test_connection();

        let got = list_transactions(
            UserID::new(user_id.as_i64() + 1),
            &TransactionFilter::default(),
            &conn,
        )
        .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let (conn, user_id) = get_test_connection();

        let got = list_categories(user_id, &conn).unwrap();

        assert_eq!(
            got,
            vec![
                Category::from("Food"),
                Category::from("Salary"),
                Category::from("Transportation")
            ]
        );
    }

    fn query(raw: &str) -> TransactionQuery {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn query_treats_all_and_empty_as_unset() {
        let filter = TransactionFilter::try_from(query(
            r#"{"type":"all","category":"all","dateFrom":"","search":"  "}"#,
        ))
        .unwrap();

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn query_parses_values() {
        let filter = TransactionFilter::try_from(query(
            r#"{"type":"expense","category":"Food","dateFrom":"2025-01-01","date_to":"2025-01-31","limit":"5"}"#,
        ))
        .unwrap();

        assert_eq!(
            filter,
            TransactionFilter {
                search: None,
                kind: Some(TransactionKind::Expense),
                category: Some(Category::from("Food")),
                date_from: Some(date!(2025 - 01 - 01)),
                date_to: Some(date!(2025 - 01 - 31)),
                limit: Some(5),
            }
        );
    }

    #[test]
    fn query_rejects_bad_values() {
        for raw in [r#"{"type":"refund"}"#, r#"{"dateTo":"yesterday"}"#, r#"{"limit":"-1"}"#] {
            assert!(
                matches!(
                    TransactionFilter::try_from(query(raw)),
                    Err(Error::InvalidOption(_))
                ),
                "expected {raw} to be rejected"
            );
        }
    }
}
