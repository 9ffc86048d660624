//! Implements a SQLite backed transaction store.

use std::{
    rc::Rc,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, types::Value, vtab::array::Array};

use crate::{
    Error, UserID,
    transaction::{
        Balance, NewTransaction, Transaction, TransactionId, TransactionStore, TransactionUpdate,
    },
};

const COLUMNS: &str = "id, name, description, datetime, price, owner_id";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::User) model,
/// the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn create(&self, owner: UserID, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" (name, description, datetime, price, owner_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    transaction.name,
                    transaction.description,
                    transaction.datetime,
                    transaction.price,
                    owner.as_i64(),
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2"
            ))?
            .query_row((id, owner.as_i64()), map_transaction_row)?;

        Ok(transaction)
    }

    fn list(&self, owner: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = self.lock()?;

        let mut statement = connection.prepare(&format!(
            "SELECT {COLUMNS} FROM \"transaction\" WHERE owner_id = ?1
             ORDER BY datetime DESC, id DESC"
        ))?;

        let transactions = statement
            .query_map([owner.as_i64()], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Replace the fields of a transaction.
    ///
    /// The description is only replaced if `update.description` is `Some`.
    fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET name = ?1, description = COALESCE(?2, description), datetime = ?3, price = ?4
                 WHERE id = ?5 AND owner_id = ?6
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    update.name,
                    update.description,
                    update.datetime,
                    update.price,
                    id,
                    owner.as_i64(),
                ),
                map_transaction_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
                error => error.into(),
            })?;

        Ok(transaction)
    }

    fn delete(&self, owner: UserID, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
            (id, owner.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }

    /// Delete the owned transactions in `ids` with a single statement.
    ///
    /// The IDs are bound as one array parameter, so the number of IDs is not
    /// limited by SQLite's cap on bound variables.
    fn delete_many(&self, owner: UserID, ids: &[TransactionId]) -> Result<usize, Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids: Array = Rc::new(ids.iter().copied().map(Value::from).collect());

        let rows_affected = self.lock()?.execute(
            "DELETE FROM \"transaction\" WHERE owner_id = ?1 AND id IN rarray(?2)",
            (owner.as_i64(), ids),
        )?;

        Ok(rows_affected)
    }

    fn balance(&self, owner: UserID) -> Result<Balance, Error> {
        let connection = self.lock()?;

        let (balance, count): (f64, i64) = connection.query_row(
            "SELECT COALESCE(SUM(price), 0.0), COUNT(id) FROM \"transaction\" WHERE owner_id = ?1",
            [owner.as_i64()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(Balance {
            balance,
            count: count as usize,
        })
    }
}

/// Create the transaction table and the index used for listing a user's
/// transactions in date order.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                datetime TEXT NOT NULL,
                price REAL NOT NULL,
                owner_id INTEGER NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_datetime
         ON \"transaction\"(owner_id, datetime)",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let description = row.get(2)?;
    let datetime = row.get(3)?;
    let price = row.get(4)?;
    let owner_id = row.get(5)?;

    Ok(Transaction {
        id,
        name,
        description,
        datetime,
        price,
        owner_id: UserID::new(owner_id),
    })
}
