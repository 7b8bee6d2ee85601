//! Finance Tracker is a personal finance tracker for recording income and
//! expense transactions.
//!
//! This library provides:
//! - a JSON REST API for managing an owner's transactions, including CSV
//!   import and export,
//! - a store abstraction over where transactions are persisted (SQLite by default),
//! - the pure view pipeline used to filter, sort and aggregate transactions
//!   for tables and charts,
//! - and an HTTP client with a local transaction cache.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod csv_export;
mod csv_import;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod owner;
mod routing;
mod transaction;

pub mod client;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Claims, JwtVerifier, TokenVerifier};
pub use csv_export::write_transactions_csv;
pub use csv_import::parse_transactions_csv;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use endpoints::format_endpoint;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use owner::OwnerId;
pub use routing::build_router;
pub use transaction::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionForm, TransactionKind,
    TransactionStore, TransactionUpdate, parse_amount, parse_date,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more of the fields required to create a transaction were
    /// missing or empty.
    #[error("all fields are required")]
    MissingFields,

    /// A field was present but its value could not be parsed, e.g. an amount
    /// that is not a number or a date that is not `YYYY-MM-DD`.
    ///
    /// Holds the name of the offending field. The field name is only logged,
    /// the client receives a generic validation message.
    #[error("the field \"{0}\" has an invalid value")]
    InvalidField(&'static str),

    /// The request body could not be parsed as JSON.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The request did not carry a bearer token that the token verifier
    /// accepted.
    ///
    /// This covers a missing header, a malformed header, a bad signature and
    /// an expired token alike so that clients cannot tell these apart.
    #[error("missing or invalid bearer token")]
    Unauthorized,

    /// The requested transaction was not found.
    ///
    /// Also returned when the transaction exists but belongs to another
    /// owner, so that the existence of other owners' records is not leaked.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// The multipart form for a CSV import did not contain a file.
    #[error("no file uploaded")]
    NoFileUploaded,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// An error occurred while writing CSV data.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while creating a signed token.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::MissingFields => (StatusCode::BAD_REQUEST, "All fields are required"),
            Error::InvalidField(_) | Error::InvalidRequestBody(_) => {
                tracing::debug!("rejected request: {self}");
                (StatusCode::BAD_REQUEST, "Invalid transaction data")
            }
            Error::NoFileUploaded => (StatusCode::BAD_REQUEST, "No file uploaded"),
            Error::MultipartError(_) => {
                tracing::debug!("rejected request: {self}");
                (StatusCode::BAD_REQUEST, "Could not read the uploaded file")
            }
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Error::NotFound => (StatusCode::NOT_FOUND, "Transaction not found"),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
