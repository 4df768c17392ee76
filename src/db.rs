//! Creates the application's tables.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, auth::create_user_table, transaction::create_transaction_table};

/// Create all of the application's tables if they do not exist yet.
///
/// Runs inside one exclusive SQL transaction so a half-initialised database is
/// never observed. Also turns on foreign key enforcement for `connection`,
/// which SQLite leaves off by default.
///
/// # Errors
/// Returns [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
