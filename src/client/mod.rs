//! An HTTP client for the finance tracker server with a local transaction cache.
//!
//! [ApiClient] sends the requests, [TransactionCache] holds the confirmed
//! state and derives the table and chart views, and [Session] ties the two
//! together.

mod api;
mod cache;
mod error;
mod session;

pub use api::ApiClient;
pub use cache::{RequestStatus, TransactionCache};
pub use error::ClientError;
pub use session::Session;
