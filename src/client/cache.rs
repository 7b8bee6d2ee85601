//! The client's local copy of the owner's transactions.

use crate::{
    client::ClientError,
    database_id::TransactionId,
    transaction::Transaction,
    view::{
        CategoryTotal, MonthlyTotals, TransactionFilter, expenses_by_category,
        expenses_by_month, filter_and_sort,
    },
};

/// The state of the last request to load the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Succeeded,
    /// The last request failed with the given message.
    Failed(String),
}

/// A cached list of transactions that mirrors the server.
///
/// The cache only changes after the server has confirmed a change, a failed
/// request leaves the list as it was.
#[derive(Debug, Clone, Default)]
pub struct TransactionCache {
    transactions: Vec<Transaction>,
    status: RequestStatus,
    last_error: Option<String>,
}

impl TransactionCache {
    /// An empty cache that has not loaded anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached transactions in the order the server sent them.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The state of the last request to load the list.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// The message of the last failed change, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Mark the list as loading.
    pub fn begin_fetch(&mut self) {
        self.status = RequestStatus::Loading;
    }

    /// Finish loading the list.
    ///
    /// On success the cached list is replaced. On failure the list is kept and
    /// the error is handed back to the caller.
    pub fn finish_fetch(
        &mut self,
        result: Result<Vec<Transaction>, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(transactions) => {
                self.transactions = transactions;
                self.status = RequestStatus::Succeeded;
                Ok(())
            }
            Err(error) => {
                self.status = RequestStatus::Failed(error.to_string());
                Err(error)
            }
        }
    }

    /// Add a transaction the server has created.
    pub fn apply_created(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
        self.last_error = None;
    }

    /// Replace the cached copy of a transaction the server has updated.
    ///
    /// Does nothing to the list if the transaction is not cached.
    pub fn apply_updated(&mut self, transaction: Transaction) {
        if let Some(cached) = self
            .transactions
            .iter_mut()
            .find(|cached| cached.id == transaction.id)
        {
            *cached = transaction;
        }

        self.last_error = None;
    }

    /// Remove a transaction the server has deleted.
    pub fn apply_deleted(&mut self, id: TransactionId) {
        self.transactions.retain(|transaction| transaction.id != id);
        self.last_error = None;
    }

    /// Record a change the server rejected. The list is left unchanged.
    pub fn record_failure(&mut self, error: &ClientError) {
        self.last_error = Some(error.to_string());
    }

    /// The transaction table for `filter`.
    pub fn table(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        filter_and_sort(&self.transactions, filter)
    }

    /// Expense totals per category.
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        expenses_by_category(&self.transactions)
    }

    /// Expense totals per month.
    pub fn monthly_totals(&self) -> MonthlyTotals {
        expenses_by_month(&self.transactions)
    }
}
