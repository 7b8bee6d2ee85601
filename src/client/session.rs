use crate::{
    client::{ApiClient, ClientError, TransactionCache},
    database_id::TransactionId,
    transaction::{Transaction, TransactionForm},
};

/// Keeps a [TransactionCache] in sync with the server.
///
/// Each action awaits exactly one request and only changes the cache once the
/// server has answered. Failed requests are not retried.
#[derive(Debug, Clone)]
pub struct Session {
    api: ApiClient,
    cache: TransactionCache,
}

impl Session {
    /// Start a session with an empty cache.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: TransactionCache::new(),
        }
    }

    /// The cached transactions and their derived views.
    pub fn cache(&self) -> &TransactionCache {
        &self.cache
    }

    /// The client used to talk to the server.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Replace the cached list with the server's.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.cache.begin_fetch();
        let result = self.api.fetch_transactions().await;

        self.cache.finish_fetch(result)
    }

    /// Create a transaction and add it to the cache.
    pub async fn create(&mut self, form: &TransactionForm) -> Result<Transaction, ClientError> {
        let transaction = self
            .api
            .create_transaction(form)
            .await
            .inspect_err(|error| self.cache.record_failure(error))?;

        self.cache.apply_created(transaction.clone());

        Ok(transaction)
    }

    /// Update a transaction and replace the cached copy.
    pub async fn update(
        &mut self,
        id: TransactionId,
        form: &TransactionForm,
    ) -> Result<Transaction, ClientError> {
        let transaction = self
            .api
            .update_transaction(id, form)
            .await
            .inspect_err(|error| self.cache.record_failure(error))?;

        self.cache.apply_updated(transaction.clone());

        Ok(transaction)
    }

    /// Delete a transaction and remove it from the cache.
    pub async fn delete(&mut self, id: TransactionId) -> Result<(), ClientError> {
        self.api
            .delete_transaction(id)
            .await
            .inspect_err(|error| self.cache.record_failure(error))?;

        self.cache.apply_deleted(id);

        Ok(())
    }

    /// Import a CSV file and add the imported transactions to the cache.
    ///
    /// Returns the number of imported transactions.
    pub async fn import_csv(
        &mut self,
        file_name: &str,
        csv_text: String,
    ) -> Result<usize, ClientError> {
        let imported = self
            .api
            .import_csv(file_name, csv_text)
            .await
            .inspect_err(|error| self.cache.record_failure(error))?;
        let count = imported.len();

        for transaction in imported {
            self.cache.apply_created(transaction);
        }

        Ok(count)
    }
}
