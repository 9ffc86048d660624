use std::{
    error::Error,
    path::PathBuf,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;

use money_tracker::{
    NewTransaction, PasswordHash, TransactionDateTime, TransactionStore, UserStore, Username,
    stores::{
        SQLiteTransactionStore, SQLiteUserStore,
        sqlite::initialize,
    },
};

/// A utility for creating a test database for the REST API server of money_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: PathBuf,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let output_path = args.output_path.as_path();

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    println!("Creating test user \"test\" with the password \"test\"...");
    let user = SQLiteUserStore::new(conn.clone()).create(
        Username::new("test")?,
        PasswordHash::new("test", PasswordHash::DEFAULT_COST)?,
    )?;

    println!("Creating test transactions...");
    let transactions = SQLiteTransactionStore::new(conn);
    for (name, datetime, price) in [
        ("Salary", "2024-01-31T09:00", 2500.0),
        ("Rent", "2024-02-01T08:00", -650.0),
        ("Groceries", "2024-02-03T17:30", -84.2),
        ("TV", "2024-02-10T15:45", -500.0),
    ] {
        transactions.create(
            user.id,
            NewTransaction {
                name: name.to_owned(),
                description: String::new(),
                datetime: TransactionDateTime::parse(datetime)?,
                price,
            },
        )?;
    }

    println!("Success!");

    Ok(())
}
