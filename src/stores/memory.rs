//! An in-memory store for users and transactions.
//!
//! Nothing is persisted, so this backend suits tests and throwaway demos.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    Error, PasswordHash, User, UserID, UserStore, Username,
    transaction::{
        Balance, NewTransaction, Transaction, TransactionId, TransactionStore, TransactionUpdate,
    },
};

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    /// Each owner's transactions, kept sorted by [Transaction::newest_first].
    transactions: HashMap<UserID, Vec<Transaction>>,
    last_user_id: i64,
    last_transaction_id: TransactionId,
}

impl Inner {
    fn owns(&self, owner: UserID) -> bool {
        self.users.iter().any(|user| user.id == owner)
    }
}

/// Stores users and transactions in memory.
///
/// Clones share the same data. IDs start at 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, Error> {
        self.inner.lock().map_err(|_| Error::DatabaseLockError)
    }
}

/// Insert `transaction` into `transactions` at the position that keeps the
/// vector sorted newest first.
fn insert_sorted(transactions: &mut Vec<Transaction>, transaction: Transaction) {
    let index = transactions.partition_point(|existing| {
        Transaction::newest_first(existing, &transaction).is_lt()
    });

    transactions.insert(index, transaction);
}

impl UserStore for MemoryStore {
    fn create(&self, username: Username, password_hash: PasswordHash) -> Result<User, Error> {
        let mut inner = self.lock()?;

        if inner.users.iter().any(|user| user.username == username) {
            return Err(Error::DuplicateUsername);
        }

        inner.last_user_id += 1;
        let user = User {
            id: UserID::new(inner.last_user_id),
            username,
            password_hash,
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        self.lock()?
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_username(&self, username: &Username) -> Result<User, Error> {
        self.lock()?
            .users
            .iter()
            .find(|user| &user.username == username)
            .cloned()
            .ok_or(Error::NotFound)
    }
}

impl TransactionStore for MemoryStore {
    fn create(&self, owner: UserID, transaction: NewTransaction) -> Result<Transaction, Error> {
        let mut inner = self.lock()?;

        if !inner.owns(owner) {
            return Err(Error::InvalidForeignKey);
        }

        inner.last_transaction_id += 1;
        let transaction = Transaction {
            id: inner.last_transaction_id,
            name: transaction.name,
            description: transaction.description,
            datetime: transaction.datetime,
            price: transaction.price,
            owner_id: owner,
        };

        insert_sorted(
            inner.transactions.entry(owner).or_default(),
            transaction.clone(),
        );

        Ok(transaction)
    }

    fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        self.lock()?
            .transactions
            .get(&owner)
            .and_then(|transactions| transactions.iter().find(|t| t.id == id))
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn list(&self, owner: UserID) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .lock()?
            .transactions
            .get(&owner)
            .cloned()
            .unwrap_or_default())
    }

    /// Replace the fields of a transaction and move it to its new position if
    /// the datetime changed.
    fn update(
        &self,
        owner: UserID,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let mut inner = self.lock()?;
        let transactions = inner
            .transactions
            .get_mut(&owner)
            .ok_or(Error::UpdateMissingTransaction)?;
        let index = transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::UpdateMissingTransaction)?;

        let mut transaction = transactions.remove(index);
        transaction.name = update.name;
        if let Some(description) = update.description {
            transaction.description = description;
        }
        transaction.datetime = update.datetime;
        transaction.price = update.price;

        insert_sorted(transactions, transaction.clone());

        Ok(transaction)
    }

    fn delete(&self, owner: UserID, id: TransactionId) -> Result<(), Error> {
        let mut inner = self.lock()?;
        let transactions = inner
            .transactions
            .get_mut(&owner)
            .ok_or(Error::DeleteMissingTransaction)?;
        let index = transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::DeleteMissingTransaction)?;

        transactions.remove(index);

        Ok(())
    }

    fn delete_many(&self, owner: UserID, ids: &[TransactionId]) -> Result<usize, Error> {
        let mut inner = self.lock()?;
        let Some(transactions) = inner.transactions.get_mut(&owner) else {
            return Ok(0);
        };

        let ids: HashSet<TransactionId> = ids.iter().copied().collect();
        let count_before = transactions.len();
        transactions.retain(|t| !ids.contains(&t.id));

        Ok(count_before - transactions.len())
    }

    fn balance(&self, owner: UserID) -> Result<Balance, Error> {
        let inner = self.lock()?;
        let transactions = inner
            .transactions
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(Balance {
            balance: transactions.iter().map(|t| t.price).sum(),
            count: transactions.len(),
        })
    }
}
