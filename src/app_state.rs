//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use rusqlite::Connection;

use crate::{
    Error,
    auth::{JwtVerifier, TokenVerifier},
    transaction::{SQLiteTransactionStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for the owners' transactions.
    pub transaction_store: Arc<dyn TransactionStore + Send + Sync>,

    /// Checks bearer tokens and resolves them to an owner.
    pub token_verifier: Arc<dyn TokenVerifier + Send + Sync>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and a JWT
    /// verifier for tokens signed with `token_secret`.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, token_secret: &str) -> Result<Self, Error> {
        let transaction_store = SQLiteTransactionStore::new(db_connection)?;

        Ok(Self::with_parts(
            transaction_store,
            JwtVerifier::new(token_secret),
        ))
    }

    /// Create a new [AppState] from any store and token verifier.
    pub fn with_parts(
        transaction_store: impl TransactionStore + Send + Sync + 'static,
        token_verifier: impl TokenVerifier + Send + Sync + 'static,
    ) -> Self {
        Self {
            transaction_store: Arc::new(transaction_store),
            token_verifier: Arc::new(token_verifier),
        }
    }
}
