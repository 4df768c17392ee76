//! The boundary between stored transactions and the aggregator.
//!
//! Records arrive loosely typed so that one bad row cannot poison a whole
//! summary: each record is validated on its own and either becomes a
//! [ValidRecord] or is skipped with a [SkipReason].

use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::transaction::{Category, Transaction, TransactionKind};

/// A transaction as handed to the aggregator, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionRecord {
    /// "income" or "expense".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// The category label, "Other" when missing or blank.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount, must be present and not negative.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The calendar date the transaction happened on.
    #[serde(default)]
    pub date: Option<Date>,
}

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The normalised category label.
    pub category: Category,
    /// The amount, never negative.
    pub amount: Decimal,
    /// The calendar date of the transaction.
    pub date: Date,
}

/// Why a record was left out of a summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The record has no amount.
    #[error("the amount is missing")]
    MissingAmount,
    /// The amount is below zero.
    #[error("the amount {0} is negative")]
    NegativeAmount(Decimal),
    /// The record has no transaction type.
    #[error("the transaction type is missing")]
    MissingKind,
    /// The transaction type is neither "income" nor "expense".
    #[error("the transaction type \"{0}\" is not income or expense")]
    UnknownKind(String),
    /// The record has no date.
    #[error("the date is missing")]
    MissingDate,
}

impl TransactionRecord {
    /// Check the record, normalising its category.
    ///
    /// # Errors
    /// Returns the first [SkipReason] found, checking the amount, then the
    /// kind, then the date.
    pub fn validate(&self) -> Result<ValidRecord, SkipReason> {
        let amount = self.amount.ok_or(SkipReason::MissingAmount)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(SkipReason::NegativeAmount(amount));
        }

        let raw_kind = self.kind.as_deref().ok_or(SkipReason::MissingKind)?;
        let kind = raw_kind
            .parse()
            .map_err(|_| SkipReason::UnknownKind(raw_kind.to_owned()))?;

        let date = self.date.ok_or(SkipReason::MissingDate)?;

        Ok(ValidRecord {
            kind,
            category: Category::new(self.category.as_deref()),
            amount,
            date,
        })
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(transaction: &Transaction) -> Self {
        Self {
            kind: Some(transaction.kind.to_string()),
            category: Some(transaction.category.to_string()),
            amount: Some(transaction.amount),
            date: Some(transaction.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        analytics::{TransactionRecord, record::SkipReason},
        transaction::{Category, TransactionKind},
    };

    fn record() -> TransactionRecord {
        TransactionRecord {
            kind: Some("expense".to_owned()),
            category: Some("Food".to_owned()),
            amount: Some(dec!(250)),
            date: Some(date!(2025 - 01 - 16)),
        }
    }

    #[test]
    fn valid_record_passes() {
        let valid = record().validate().unwrap();

        assert_eq!(valid.kind, TransactionKind::Expense);
        assert_eq!(valid.category, Category::from("Food"));
        assert_eq!(valid.amount, dec!(250));
    }

    #[test]
    fn blank_category_becomes_other() {
        let valid = TransactionRecord {
            category: Some(" ".to_owned()),
            ..record()
        }
        .validate()
        .unwrap();

        assert_eq!(valid.category.as_str(), Category::OTHER);
    }

    #[test]
    fn zero_amount_is_valid() {
        let result = TransactionRecord {
            amount: Some(dec!(0)),
            ..record()
        }
        .validate();

        assert!(result.is_ok());
    }

    #[test]
    fn reports_skip_reasons() {
        let cases = [
            (
                TransactionRecord {
                    amount: None,
                    ..record()
                },
                SkipReason::MissingAmount,
            ),
            (
                TransactionRecord {
                    amount: Some(dec!(-0.01)),
                    ..record()
                },
                SkipReason::NegativeAmount(dec!(-0.01)),
            ),
            (
                TransactionRecord {
                    kind: None,
                    ..record()
                },
                SkipReason::MissingKind,
            ),
            (
                TransactionRecord {
                    kind: Some("transfer".to_owned()),
                    ..record()
                },
                SkipReason::UnknownKind("transfer".to_owned()),
            ),
            (
                TransactionRecord {
                    date: None,
                    ..record()
                },
                SkipReason::MissingDate,
            ),
        ];

        for (record, want) in cases {
            assert_eq!(record.validate(), Err(want));
        }
    }

    #[test]
    fn deserializes_partial_json() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"type":"income","date":"2025-01-15"}"#).unwrap();

        assert_eq!(record.validate(), Err(SkipReason::MissingAmount));
    }
}
