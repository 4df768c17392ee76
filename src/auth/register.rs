//! Registering new users.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{Email, PasswordHash, User, ValidatedPassword, create_user, set_auth_cookie},
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The duration for which the new user's auth cookie is valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost used to hash the password.
    pub password_cost: u32,
    /// The database connection for creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_duration: state.cookie_duration,
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body of a registration request.
#[derive(Deserialize)]
pub struct RegisterForm {
    /// The user's display name.
    pub name: String,
    /// The email to log in with.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// Create a new user and log them in.
///
/// Responds with `201 Created`, the new user and an auth cookie.
///
/// # Errors
/// - [Error::EmptyName] if the name is blank,
/// - [Error::InvalidEmail] if the email is malformed,
/// - [Error::TooWeak] if the password is easy to guess,
/// - [Error::DuplicateEmail] if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, PrivateCookieJar, Json<User>), Error> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let email = Email::new(&form.email)?;
    let password = ValidatedPassword::new(&form.password, &[name, email.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_cost)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        create_user(name, email, password_hash, &connection)?
    };

    tracing::info!("Registered user {}", user.id);

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((StatusCode::CREATED, jar, Json(user)))
}

#[cfg(test)]
mod register_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        auth::COOKIE_TOKEN,
        endpoints,
        test_utils::{TEST_PASSWORD, get_test_server},
    };

    #[tokio::test]
    async fn register_creates_user_and_sets_cookie() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Nandish Kumar",
                "email": "Nandish@Example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["name"], "Nandish Kumar");
        assert_eq!(body["email"], "nandish@example.com");
        assert!(body.get("password_hash").is_none());
        let _ = response.cookie(COOKIE_TOKEN);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let server = get_test_server();
        let form = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": TEST_PASSWORD,
        });
        server.post(endpoints::REGISTER).json(&form).await;

        let response = server.post(endpoints::REGISTER).json(&form).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "password",
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("password is too weak")
        );
    }

    #[tokio::test]
    async fn register_rejects_blank_name() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "   ",
                "email": "ada@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
