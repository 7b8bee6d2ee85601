use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};

use crate::{
    Error, OwnerId,
    csv_import::csv::parse_transactions_csv,
    transaction::{Transaction, TransactionState},
};

/// Route handler for importing transactions from an uploaded CSV file.
///
/// The file is read from the multipart field named "file", or the first
/// field that carries a file name. Every valid line is stored for the
/// authenticated owner in a single batch. Responds with 201 Created and the
/// stored transactions.
pub async fn import_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(owner): Extension<OwnerId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let start_time = std::time::Instant::now();

    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Import request was not a multipart form: {rejection}");
        Error::NoFileUploaded
    })?;
    let csv_text = read_uploaded_file(&mut multipart).await?;
    let transactions = parse_transactions_csv(&csv_text);

    let imported = state
        .transaction_store
        .insert_many(&owner, transactions)
        .inspect_err(|error| tracing::error!("Failed to import transactions: {error}"))?;

    tracing::info!(
        "Imported {} transactions for {owner} in {}ms",
        imported.len(),
        start_time.elapsed().as_millis()
    );

    Ok((StatusCode::CREATED, Json(imported)))
}

async fn read_uploaded_file(multipart: &mut Multipart) -> Result<String, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_owned();
        let data = field
            .text()
            .await
            .map_err(|error| Error::MultipartError(error.body_text()))?;

        tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

        return Ok(data);
    }

    Err(Error::NoFileUploaded)
}

#[cfg(test)]
mod import_transactions_tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::json;

    use crate::{
        OwnerId, Transaction, endpoints,
        test_utils::{must_create_test_server, must_create_test_state, must_create_token},
    };

    fn csv_form(text: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::text(text.to_owned())
                .file_name("transactions.csv")
                .mime_type("text/csv"),
        )
    }

    #[tokio::test]
    async fn imports_valid_lines() {
        let state = must_create_test_state();
        let server = must_create_test_server(state.clone());
        let text = "date,description,category,amount,type\n\
            2025-01-10,Coffee,Food,5,expense\n\
            2025-01-10,Broken,Food,5\n\
            2025-01-11,Salary,Work,1000,income\n";

        let response = server
            .post(endpoints::IMPORT)
            .authorization_bearer(must_create_token("owner-1"))
            .multipart(csv_form(text))
            .await;

        response.assert_status(StatusCode::CREATED);
        let imported = response.json::<Vec<Transaction>>();
        assert_eq!(imported.len(), 2);
        assert!(
            imported
                .iter()
                .all(|transaction| transaction.owner == OwnerId::new("owner-1"))
        );
        assert_eq!(
            state
                .transaction_store
                .find_by_owner(&OwnerId::new("owner-1"))
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn header_only_file_imports_nothing() {
        let server = must_create_test_server(must_create_test_state());

        let response = server
            .post(endpoints::IMPORT)
            .authorization_bearer(must_create_token("owner-1"))
            .multipart(csv_form("date,description,category,amount,type\n"))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let server = must_create_test_server(must_create_test_state());

        let response = server
            .post(endpoints::IMPORT)
            .authorization_bearer(must_create_token("owner-1"))
            .multipart(MultipartForm::new().add_text("note", "no file here"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"message": "No file uploaded"}));
    }

    #[tokio::test]
    async fn non_multipart_request_is_rejected() {
        let server = must_create_test_server(must_create_test_state());

        let response = server
            .post(endpoints::IMPORT)
            .authorization_bearer(must_create_token("owner-1"))
            .json(&json!({"file": "date,description\n"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"message": "No file uploaded"}));
    }

    #[tokio::test]
    async fn requires_token() {
        let server = must_create_test_server(must_create_test_state());

        let response = server
            .post(endpoints::IMPORT)
            .multipart(csv_form("date,description,category,amount,type\n"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
