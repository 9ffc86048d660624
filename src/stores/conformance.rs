//! Behaviour every store backend must share, run against each backend from
//! its own test module.

use time::macros::datetime;

use crate::{
    Error, PasswordHash, User, UserStore, Username,
    transaction::{NewTransaction, TransactionDateTime, TransactionStore, TransactionUpdate},
};

fn create_user(users: &dyn UserStore, name: &str) -> User {
    users
        .create(
            Username::new(name).unwrap(),
            PasswordHash::new_unchecked("hunter2"),
        )
        .unwrap()
}

fn new_transaction(name: &str, datetime: TransactionDateTime, price: f64) -> NewTransaction {
    NewTransaction {
        name: name.to_owned(),
        description: String::new(),
        datetime,
        price,
    }
}

fn tv() -> NewTransaction {
    new_transaction(
        "TV",
        TransactionDateTime::new(datetime!(2024-01-01 15:45)),
        -500.0,
    )
}

pub(crate) fn create_and_get(users: &dyn UserStore, transactions: &dyn TransactionStore) {
    let alice = create_user(users, "alice");

    let created = transactions.create(alice.id, tv()).unwrap();

    assert_eq!(created.name, "TV");
    assert_eq!(created.description, "");
    assert_eq!(
        created.datetime,
        TransactionDateTime::new(datetime!(2024-01-01 15:45))
    );
    assert_eq!(created.price, -500.0);
    assert_eq!(created.owner_id, alice.id);
    assert_eq!(transactions.get(alice.id, created.id), Ok(created.clone()));
    assert_eq!(transactions.get(alice.id, created.id + 1), Err(Error::NotFound));
}

pub(crate) fn list_is_newest_first(users: &dyn UserStore, transactions: &dyn TransactionStore) {
    let alice = create_user(users, "alice");
    let datetimes = [
        datetime!(2024-03-01 12:00),
        datetime!(2023-12-31 23:59),
        datetime!(2024-05-20 08:30),
        datetime!(2024-03-01 12:00),
        datetime!(2024-01-15 00:00),
    ];
    for (i, datetime) in datetimes.into_iter().enumerate() {
        transactions
            .create(
                alice.id,
                new_transaction(&format!("#{i}"), TransactionDateTime::new(datetime), 1.0),
            )
            .unwrap();
    }

    let listed = transactions.list(alice.id).unwrap();

    assert_eq!(listed.len(), datetimes.len());
    for pair in listed.windows(2) {
        assert!(
            (pair[0].datetime, pair[0].id) > (pair[1].datetime, pair[1].id),
            "{:?} should come after {:?}",
            pair[1],
            pair[0]
        );
    }
    let names: Vec<_> = listed.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["#2", "#3", "#0", "#4", "#1"]);
}

pub(crate) fn owners_are_isolated(users: &dyn UserStore, transactions: &dyn TransactionStore) {
    let alice = create_user(users, "alice");
    let bob = create_user(users, "bob");
    let alices = transactions.create(alice.id, tv()).unwrap();

    assert_eq!(transactions.list(bob.id), Ok(vec![]));
    assert_eq!(transactions.get(bob.id, alices.id), Err(Error::NotFound));
    assert_eq!(
        transactions.update(
            bob.id,
            alices.id,
            TransactionUpdate {
                name: "Stolen".to_owned(),
                description: None,
                datetime: alices.datetime,
                price: 0.0,
            }
        ),
        Err(Error::UpdateMissingTransaction)
    );
    assert_eq!(
        transactions.delete(bob.id, alices.id),
        Err(Error::DeleteMissingTransaction)
    );
    assert_eq!(transactions.list(alice.id), Ok(vec![alices]));
}

pub(crate) fn update_replaces_fields(users: &dyn UserStore, transactions: &dyn TransactionStore) {
    let alice = create_user(users, "alice");
    let mut original = tv();
    original.description = "Living room".to_owned();
    let original = transactions.create(alice.id, original).unwrap();
    let later = transactions
        .create(
            alice.id,
            new_transaction(
                "Couch",
                TransactionDateTime::new(datetime!(2024-02-01 10:00)),
                -900.0,
            ),
        )
        .unwrap();

    let updated = transactions
        .update(
            alice.id,
            original.id,
            TransactionUpdate {
                name: "OLED TV".to_owned(),
                description: None,
                datetime: TransactionDateTime::new(datetime!(2024-03-01 09:00)),
                price: -1500.0,
            },
        )
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "OLED TV");
    assert_eq!(updated.description, "Living room");
    assert_eq!(updated.price, -1500.0);
    assert_eq!(transactions.get(alice.id, original.id), Ok(updated.clone()));
    // The new datetime moves the transaction ahead of the couch.
    let ids: Vec<_> = transactions
        .list(alice.id)
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![original.id, later.id]);

    let cleared = transactions
        .update(
            alice.id,
            original.id,
            TransactionUpdate {
                name: "OLED TV".to_owned(),
                description: Some(String::new()),
                datetime: updated.datetime,
                price: updated.price,
            },
        )
        .unwrap();
    assert_eq!(cleared.description, "");
}

pub(crate) fn update_missing_has_no_side_effects(
    users: &dyn UserStore,
    transactions: &dyn TransactionStore,
) {
    let alice = create_user(users, "alice");
    let existing = transactions.create(alice.id, tv()).unwrap();

    let result = transactions.update(
        alice.id,
        existing.id + 100,
        TransactionUpdate {
            name: "Ghost".to_owned(),
            description: Some("boo".to_owned()),
            datetime: existing.datetime,
            price: 1.0,
        },
    );

    assert_eq!(result, Err(Error::UpdateMissingTransaction));
    assert_eq!(transactions.list(alice.id), Ok(vec![existing]));
}

pub(crate) fn delete_removes_transaction(
    users: &dyn UserStore,
    transactions: &dyn TransactionStore,
) {
    let alice = create_user(users, "alice");
    let existing = transactions.create(alice.id, tv()).unwrap();

    assert_eq!(transactions.delete(alice.id, existing.id), Ok(()));
    assert_eq!(transactions.get(alice.id, existing.id), Err(Error::NotFound));
    assert_eq!(
        transactions.delete(alice.id, existing.id),
        Err(Error::DeleteMissingTransaction)
    );
}

pub(crate) fn delete_many_only_deletes_owned(
    users: &dyn UserStore,
    transactions: &dyn TransactionStore,
) {
    let alice = create_user(users, "alice");
    let bob = create_user(users, "bob");
    let alice_first = transactions.create(alice.id, tv()).unwrap();
    let alice_second = transactions.create(alice.id, tv()).unwrap();
    let alice_kept = transactions.create(alice.id, tv()).unwrap();
    let bobs = transactions.create(bob.id, tv()).unwrap();

    let deleted = transactions
        .delete_many(
            alice.id,
            &[alice_first.id, bobs.id, alice_second.id, alice_kept.id + 1000],
        )
        .unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(transactions.list(alice.id), Ok(vec![alice_kept.clone()]));
    assert_eq!(transactions.list(bob.id), Ok(vec![bobs.clone()]));
    assert_eq!(transactions.delete_many(alice.id, &[bobs.id]), Ok(0));
}

pub(crate) fn balance_sums_prices(users: &dyn UserStore, transactions: &dyn TransactionStore) {
    let alice = create_user(users, "alice");
    let bob = create_user(users, "bob");
    let when = TransactionDateTime::new(datetime!(2024-01-01 15:45));
    transactions
        .create(alice.id, new_transaction("Salary", when, 2500.0))
        .unwrap();
    transactions
        .create(alice.id, new_transaction("Rent", when, -600.5))
        .unwrap();
    transactions
        .create(bob.id, new_transaction("Lottery", when, 1_000_000.0))
        .unwrap();

    let balance = transactions.balance(alice.id).unwrap();

    assert_eq!(balance.count, 2);
    assert!((balance.balance - 1899.5).abs() < 1e-9);

    let carol = create_user(users, "carol");
    let empty = transactions.balance(carol.id).unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.balance, 0.0);
}

pub(crate) fn duplicate_username_is_rejected(users: &dyn UserStore) {
    create_user(users, "alice");

    let result = users.create(
        Username::new("alice").unwrap(),
        PasswordHash::new_unchecked("hunter3"),
    );

    assert_eq!(result, Err(Error::DuplicateUsername));
}

pub(crate) fn delete_many_handles_large_id_lists(
    users: &dyn UserStore,
    transactions: &dyn TransactionStore,
) {
    let alice = create_user(users, "alice");
    let deleted_one = transactions.create(alice.id, tv()).unwrap();
    let kept = transactions.create(alice.id, tv()).unwrap();
    let mut ids: Vec<_> = (1_000_000..1_300_000).collect();
    ids.push(deleted_one.id);

    let deleted = transactions.delete_many(alice.id, &ids).unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(transactions.list(alice.id), Ok(vec![kept]));
}
