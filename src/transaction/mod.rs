//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the forms for creating and updating transactions
//! - The `TransactionStore` trait and its SQLite implementation
//! - Route handlers for listing, creating, updating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod sqlite_store;
mod store;

pub use core::{
    NewTransaction, Transaction, TransactionForm, TransactionKind, TransactionUpdate,
    parse_amount, parse_date,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use sqlite_store::SQLiteTransactionStore;
pub(crate) use sqlite_store::create_transaction_table;
pub use store::{TransactionState, TransactionStore};
