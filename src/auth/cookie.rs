//! Functions for handling user authentication with an encrypted cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{UserID, token::Token},
};

/// The name of the cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);
/// How long the auth cookie lasts if the user asks to be remembered at log-in.
pub const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

fn build_token_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    // The frontend may be served from another site, see [crate::cors].
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .expires(expires_at)
        .http_only(true)
        .same_site(SameSite::None)
        .secure(true)
        .build()
}

fn add_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(build_token_cookie(value, token.expires_at)))
}

/// Add an auth cookie for `user_id` to the cookie jar that expires `duration` from now.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };

    add_token(jar, &token)
}

/// Overwrite the auth cookie with an expired placeholder so the client drops it.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::None)
            .secure(true),
    )
}

/// Read the token from the auth cookie and check that it has not expired.
///
/// # Errors
/// Returns [Error::NotAuthenticated] if the cookie is missing, cannot be
/// decrypted or parsed, or holds an expired token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::NotAuthenticated)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::NotAuthenticated)?;

    if !token.is_valid_at(OffsetDateTime::now_utc()) {
        return Err(Error::NotAuthenticated);
    }

    Ok(token)
}

/// Push the expiry of the auth cookie out to the later of now plus `duration`
/// and its current expiry.
///
/// # Errors
/// Returns an error if there is no valid token in `jar`; the jar is not modified.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::NotAuthenticated)?;

    let token = Token {
        expires_at: max(token.expires_at, new_expiry),
        ..token
    };

    add_token(jar, &token)
}
