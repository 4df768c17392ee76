//! Validated, normalised email addresses.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::Error;

/// An email address that has been trimmed, lower-cased and checked for validity.
///
/// Emails are the log-in identifier, so normalising them once here means
/// "Foo@Example.com" and "foo@example.com " refer to the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Parse and normalise `raw_email`.
    ///
    /// # Errors
    /// Returns [Error::InvalidEmail] if the trimmed string is not a valid address.
    pub fn new(raw_email: &str) -> Result<Self, Error> {
        let trimmed = raw_email.trim();

        if !EmailAddress::is_valid(trimmed) {
            return Err(Error::InvalidEmail(trimmed.to_owned()));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Wrap an email read from the database without validation.
    pub fn new_unchecked(raw_email: &str) -> Self {
        Self(raw_email.to_owned())
    }

    /// The normalised address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
