use axum::{
    Extension, Json,
    extract::State,
};

use crate::{
    Error, OwnerId,
    transaction::{Transaction, TransactionState},
};

/// A route handler that responds with all of the owner's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<Vec<Transaction>>, Error> {
    state
        .transaction_store
        .find_by_owner(&owner)
        .inspect_err(|error| tracing::error!("Could not list transactions for {owner}: {error}"))
        .map(Json)
}
