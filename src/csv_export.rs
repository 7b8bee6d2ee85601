//! Exporting transactions as a CSV file.

use axum::{
    Extension,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    Error, OwnerId,
    transaction::{Transaction, TransactionState},
};

const CSV_HEADER: [&str; 5] = ["date", "description", "category", "amount", "type"];

/// Write `transactions` as CSV with the columns date, description, category,
/// amount and type.
///
/// The output always starts with the header row, even if there are no transactions.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV could not be written.
pub fn write_transactions_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for transaction in transactions {
        let date = transaction.occurred_on.to_string();
        let amount = transaction.amount.to_string();

        writer
            .write_record([
                date.as_str(),
                transaction.description.as_str(),
                transaction.category.as_str(),
                amount.as_str(),
                transaction.kind.as_str(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// Route handler that downloads all of the owner's transactions as `transactions.csv`.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .find_by_owner(&owner)
        .inspect_err(|error| {
            tracing::error!("Could not export transactions for {owner}: {error}")
        })?;
    let csv_text = write_transactions_csv(&transactions)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv"),
            (CONTENT_DISPOSITION, "attachment; filename=\"transactions.csv\""),
        ],
        csv_text,
    )
        .into_response())
}
