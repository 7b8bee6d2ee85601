use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error, OwnerId,
    transaction::{TransactionState, edit_endpoint::parse_transaction_id},
};

/// A route handler for deleting one of the owner's transactions.
///
/// Responds with a confirmation message, or 404 if the owner has no
/// transaction with the ID.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    state
        .transaction_store
        .delete_by_owner_and_id(&owner, transaction_id)
        .inspect_err(|error| {
            tracing::debug!("Could not delete transaction {transaction_id} for {owner}: {error}")
        })?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}
