//! The token stored in the encrypted auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

/// Identifies a logged in user until `expires_at`.
///
/// The token is only ever stored inside a private (encrypted and signed)
/// cookie, so clients can neither read nor forge it.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,

    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token is still valid at `now`.
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use crate::auth::{UserID, token::Token};

    #[test]
    fn serialise_token() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: datetime!(2025-12-21 03:54:00 UTC),
        };

        let actual = serde_json::to_string(&token).unwrap();

        assert_eq!(
            actual,
            r#"{"user_id":1,"expires_at":"2025-12-21T03:54:00Z"}"#
        );
    }

    #[test]
    fn deserialise_token_with_midnight_expiry() {
        let want = Token {
            user_id: UserID::new(7),
            expires_at: datetime!(2025-12-21 00:00:00 UTC),
        };

        let got: Token =
            serde_json::from_str(r#"{"user_id":7,"expires_at":"2025-12-21T00:00:00Z"}"#).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn token_expires() {
        let expires_at = datetime!(2025-12-21 00:00:00 UTC);
        let token = Token {
            user_id: UserID::new(1),
            expires_at,
        };

        assert!(token.is_valid_at(expires_at - Duration::seconds(1)));
        assert!(!token.is_valid_at(expires_at));
    }
}
