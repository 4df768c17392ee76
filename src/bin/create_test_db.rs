use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use pocket_money::{
    Email, PasswordHash, ValidatedPassword, count_transactions, create_transaction, create_user,
    initialize_db, sample_transactions,
};

/// A utility for creating a test database for the Pocket Money REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        "Nandish Kumar",
        Email::new("nandish@example.com")?,
        password_hash,
        &conn,
    )?;

    println!("Adding sample transactions...");

    for transaction in sample_transactions() {
        create_transaction(transaction, user.id, &conn)?;
    }

    println!("Added {} transactions.", count_transactions(user.id, &conn)?);

    println!("Success! Log in as {} with the password \"test\".", user.email);

    Ok(())
}
