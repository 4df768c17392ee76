//! Open-ended category labels.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A category label such as "Food" or "Salary".
///
/// Labels are free-form. Missing or blank labels become [Category::OTHER].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct Category(String);

impl Category {
    /// The label used for transactions without a category.
    pub const OTHER: &'static str = "Other";

    /// Normalise `raw`: surrounding whitespace is trimmed and a missing or
    /// blank label becomes "Other".
    pub fn new(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(label) if !label.is_empty() => Self(label.to_owned()),
            _ => Self(Self::OTHER.to_owned()),
        }
    }

    /// The normalised label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Option<String>> for Category {
    fn from(value: Option<String>) -> Self {
        Self::new(value.as_deref())
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(Some(value))
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(|label| Self::new(Some(label)))
    }
}
