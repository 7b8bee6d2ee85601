//! A thin async client for the finance tracker REST API.

use std::time::Duration;

use reqwest::{
    RequestBuilder, Response,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::{
    client::ClientError,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    transaction::{Transaction, TransactionForm},
};

const USER_AGENT: &str = concat!("finance_tracker/", env!("CARGO_PKG_VERSION"));

/// Sends requests to the finance tracker server on behalf of one owner.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. "http://127.0.0.1:3000",
    /// that authenticates with the bearer `token`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client could not be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        })
    }

    /// Get all of the owner's transactions, newest first.
    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        let response = self
            .send(self.http.get(self.url(endpoints::TRANSACTIONS_API)))
            .await?;

        Ok(response.json().await?)
    }

    /// Create a transaction and return it as stored by the server.
    pub async fn create_transaction(
        &self,
        form: &TransactionForm,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .send(
                self.http
                    .post(self.url(endpoints::TRANSACTIONS_API))
                    .json(form),
            )
            .await?;

        Ok(response.json().await?)
    }

    /// Update the fields of transaction `id` that are set in `form`.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        form: &TransactionForm,
    ) -> Result<Transaction, ClientError> {
        let response = self
            .send(
                self.http
                    .put(self.url(&format_endpoint(endpoints::TRANSACTION, id)))
                    .json(form),
            )
            .await?;

        Ok(response.json().await?)
    }

    /// Delete transaction `id`.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), ClientError> {
        self.send(
            self.http
                .delete(self.url(&format_endpoint(endpoints::TRANSACTION, id))),
        )
        .await?;

        Ok(())
    }

    /// Upload `csv_text` as the file `file_name` and return the imported transactions.
    pub async fn import_csv(
        &self,
        file_name: &str,
        csv_text: String,
    ) -> Result<Vec<Transaction>, ClientError> {
        let part = Part::text(csv_text)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self
            .send(self.http.post(self.url(endpoints::IMPORT)).multipart(form))
            .await?;

        Ok(response.json().await?)
    }

    /// Download all of the owner's transactions as CSV text.
    pub async fn export_csv(&self) -> Result<String, ClientError> {
        let response = self
            .send(self.http.get(self.url(endpoints::EXPORT)))
            .await?;

        Ok(response.text().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned(),
        };

        tracing::debug!("Request rejected with {status}: {message}");

        Err(ClientError::Status { status, message })
    }
}
