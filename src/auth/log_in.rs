//! Logging users in and out.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        Email, REMEMBER_ME_COOKIE_DURATION, User, get_user_by_email, invalidate_auth_cookie,
        set_auth_cookie,
    },
};

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The duration for which auth cookies are valid without "remember me".
    pub cookie_duration: Duration,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body of a log-in request.
#[derive(Deserialize)]
pub struct LogInForm {
    /// The email the user registered with.
    pub email: String,
    /// The plain-text password.
    pub password: String,
    /// Keep the user logged in for a week instead of a few minutes.
    #[serde(default)]
    pub remember_me: bool,
}

/// Check the user's credentials and set the auth cookie.
///
/// # Errors
/// Returns [Error::InvalidCredentials] for an unknown email or a wrong password.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Json(form): Json<LogInForm>,
) -> Result<(PrivateCookieJar, Json<User>), Error> {
    let email = Email::new(&form.email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&form.password)? {
        tracing::debug!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let duration = if form.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };
    let jar = set_auth_cookie(jar, user.id, duration)?;

    tracing::info!("User {} logged in", user.id);

    Ok((jar, Json(user)))
}

/// The body returned by simple acknowledgement endpoints.
#[derive(Debug, Serialize)]
pub struct Message {
    /// What happened.
    pub message: &'static str,
}

/// Invalidate the auth cookie.
pub async fn post_log_out(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<Message>) {
    (
        invalidate_auth_cookie(jar),
        Json(Message {
            message: "Logged out",
        }),
    )
}
