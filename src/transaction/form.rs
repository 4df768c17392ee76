//! Request bodies for creating and editing transactions.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    Error,
    transaction::{
        Category, Transaction, TransactionBuilder, TransactionKind, core::normalize_note,
    },
};

/// Parse a calendar date from either "YYYY-MM-DD" or an RFC 3339 date-time.
///
/// Browsers send `<input type="date">` values in the first form while
/// `Date.toISOString()` produces the second. The date part of a date-time is
/// taken as written, the offset is not applied.
pub(crate) fn parse_date(raw: &str) -> Result<Date, Error> {
    let raw = raw.trim();

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339).map(|date_time| date_time.date()))
        .map_err(|_| Error::InvalidTransaction(format!("\"{raw}\" is not a valid date")))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse_date(&raw).map_err(de::Error::custom)
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

/// Distinguish a field that is absent (`None`) from one that is `null` (`Some(None)`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category label, "Other" if missing or blank.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount, a JSON number or a decimal string.
    pub amount: Decimal,
    /// The date of the transaction.
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Date,
    /// An optional description.
    #[serde(default)]
    pub note: Option<String>,
}

impl From<TransactionForm> for TransactionBuilder {
    fn from(form: TransactionForm) -> Self {
        Transaction::build(form.kind, form.amount, form.date)
            .category(form.category)
            .note(form.note.as_deref())
    }
}

/// The JSON body for a partial update of a transaction.
///
/// Absent fields are left unchanged. `note: null` clears the note.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    /// The new kind.
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    /// The new category, `null` or blank resets it to "Other".
    #[serde(default, deserialize_with = "deserialize_present")]
    pub category: Option<Option<String>>,
    /// The new amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The new date.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<Date>,
    /// The new note.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub note: Option<Option<String>>,
}

impl TransactionPatch {
    /// Apply the patch on top of `transaction`, leaving absent fields unchanged.
    pub fn apply_to(self, transaction: &Transaction) -> TransactionBuilder {
        TransactionBuilder {
            kind: self.kind.unwrap_or(transaction.kind),
            category: match self.category {
                Some(category) => Category::from(category),
                None => transaction.category.clone(),
            },
            amount: self.amount.unwrap_or(transaction.amount),
            date: self.date.unwrap_or(transaction.date),
            note: match self.note {
                Some(note) => normalize_note(note.as_deref()),
                None => transaction.note.clone(),
            },
        }
    }
}
