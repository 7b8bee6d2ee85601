//! Importing transactions from uploaded CSV files.

mod csv;
mod import_endpoint;

pub use csv::parse_transactions_csv;
pub use import_endpoint::import_transactions_endpoint;
