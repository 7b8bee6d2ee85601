use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error, OwnerId,
    transaction::{Transaction, TransactionForm, TransactionState},
};

/// A route handler for creating a new transaction for the authenticated owner.
///
/// Responds with 201 Created and the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
    body: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = body.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let new_transaction = form.into_new_transaction()?;

    let transaction = state
        .transaction_store
        .insert(&owner, new_transaction)
        .inspect_err(|error| tracing::error!("Could not create transaction for {owner}: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
