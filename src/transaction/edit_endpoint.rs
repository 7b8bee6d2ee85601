use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error, OwnerId,
    database_id::TransactionId,
    transaction::{Transaction, TransactionForm, TransactionState},
};

/// A route handler for updating one of the owner's transactions.
///
/// Only the fields present in the body are changed. Responds with the
/// updated transaction, or 404 if the owner has no transaction with the ID.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
    Path(transaction_id): Path<String>,
    body: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;
    let Json(form) = body.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let update = form.into_update()?;

    state
        .transaction_store
        .update_by_owner_and_id(&owner, transaction_id, update)
        .inspect_err(|error| {
            tracing::debug!("Could not update transaction {transaction_id} for {owner}: {error}")
        })
        .map(Json)
}

/// Parse a transaction ID from a path segment.
///
/// An ID that is not a number cannot name any transaction, so it is not found.
pub(crate) fn parse_transaction_id(text: &str) -> Result<TransactionId, Error> {
    text.parse().map_err(|_| Error::NotFound)
}
