//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `TransactionStore` trait
//! - Parsing and validating the transaction request bodies
//! - Route handlers for creating, listing, updating and deleting transactions

mod core;
mod create_endpoint;
mod datetime;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use self::core::{
    Balance, NewTransaction, Transaction, TransactionId, TransactionStore, TransactionUpdate,
};
pub use create_endpoint::create_transaction_endpoint;
pub use datetime::TransactionDateTime;
pub use delete_endpoint::{
    BulkDeleteRequest, BulkDeleteResponse, DeleteResponse, bulk_delete_transactions_endpoint,
    delete_transaction_endpoint,
};
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::{PriceInput, TransactionForm};
pub use list_endpoint::{get_balance_endpoint, list_transactions_endpoint};
