use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    AppState, Error, OwnerId,
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction, TransactionUpdate},
};

/// Handles the creation and retrieval of transactions.
///
/// Every operation is scoped to an owner. A transaction that belongs to a
/// different owner is treated exactly like one that does not exist.
pub trait TransactionStore {
    /// Get all of `owner`'s transactions, newest first.
    ///
    /// Transactions on the same date are ordered by ascending ID.
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>, Error>;

    /// Store a new transaction for `owner`.
    fn insert(&self, owner: &OwnerId, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Store many new transactions for `owner` in a single batch.
    ///
    /// Either all transactions are stored or none are.
    fn insert_many(
        &self,
        owner: &OwnerId,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Apply `update` to the transaction with `id` if it belongs to `owner`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id` owned by `owner`.
    fn update_by_owner_and_id(
        &self,
        owner: &OwnerId,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with `id` if it belongs to `owner`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id` owned by `owner`.
    fn delete_by_owner_and_id(&self, owner: &OwnerId, id: TransactionId) -> Result<(), Error>;
}

/// The state needed by the transaction endpoints.
#[derive(Clone)]
pub struct TransactionState {
    /// The store for managing transactions.
    pub transaction_store: Arc<dyn TransactionStore + Send + Sync>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}
