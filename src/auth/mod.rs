//! User accounts and cookie based authentication.

mod cookie;
mod email;
mod log_in;
mod middleware;
mod password;
mod register;
mod token;
mod user;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use email::Email;
pub use log_in::{Message, post_log_in, post_log_out};
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register::register_user;
pub use user::{
    User, UserID, create_user, create_user_table, get_current_user, get_user_by_email,
    update_password,
};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
