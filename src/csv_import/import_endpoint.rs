//! Defines the endpoint for importing transactions from uploaded CSV files.

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    http::StatusCode,
};

use crate::{Error, Ledger, csv_import::parse_csv, transaction::Transaction};

/// Route handler for importing transactions from CSV files.
///
/// Every file in the multipart form is read first, then the records of all
/// files are imported as one batch on the blocking thread pool. Responds with
/// the saved transactions.
pub async fn import_transactions_endpoint(
    State(ledger): State<Ledger>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let start_time = std::time::Instant::now();
    let mut records = Vec::new();
    let mut file_count = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let csv_data = parse_multipart_field(field).await?;
        records.extend(
            parse_csv(&csv_data)
                .inspect_err(|error| tracing::debug!("Failed to parse CSV: {}", error))?,
        );
        file_count += 1;
    }

    if file_count == 0 {
        return Err(Error::MultipartError(
            "the form did not contain any files".to_owned(),
        ));
    }

    let record_count = records.len();
    let transactions = tokio::task::spawn_blocking(move || ledger.import_batch(records))
        .await
        .map_err(|error| {
            tracing::error!("Import of {record_count} records did not finish: {error}");
            Error::BackgroundTaskError(error.to_string())
        })??;

    tracing::info!(
        "Imported {} transactions from {} file(s) in {}ms",
        transactions.len(),
        file_count,
        start_time.elapsed().as_millis()
    );

    Ok((StatusCode::CREATED, Json(transactions)))
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCSV);
    }

    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };
    let data = match field.text().await {
        Ok(data) => data,
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

#[cfg(test)]
mod import_transactions_tests {
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use rusqlite::Connection;

    use crate::{
        AppState, build_router, endpoints,
        transaction::{Transaction, TransactionRequest, TransactionType},
    };

    const BUDGET_CSV: &str = "title, type, value, category\n\
        Loan, income, 1500, Others\n\
        Website Hosting, outcome, 50, Others\n\
        Ice cream, outcome, 3, Food";

    fn get_test_state() -> AppState {
        AppState::new(Connection::open_in_memory().unwrap()).expect("Could not create app state")
    }

    fn csv_form(files: &[&str]) -> MultipartForm {
        files
            .iter()
            .enumerate()
            .fold(MultipartForm::new(), |form, (index, text)| {
                form.add_part(
                    "files",
                    Part::bytes(text.as_bytes().to_vec())
                        .file_name(format!("import_{index}.csv"))
                        .mime_type("text/csv"),
                )
            })
    }

    #[tokio::test]
    async fn imports_csv_file() {
        let state = get_test_state();
        let server = TestServer::try_new(build_router(state.clone()))
            .expect("Could not create test server.");

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(csv_form(&[BUDGET_CSV]))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transactions = response.json::<Vec<Transaction>>();
        let titles: Vec<_> = transactions.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Loan", "Website Hosting", "Ice cream"]);
        assert_eq!(state.ledger.compute_balance().unwrap().total, 1447.0);
        assert_eq!(state.ledger.list_categories().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn files_are_imported_as_one_batch() {
        let state = get_test_state();
        let server = TestServer::try_new(build_router(state.clone()))
            .expect("Could not create test server.");
        let outcomes = "title,type,value,category\nrent,outcome,80,housing";
        let incomes = "title,type,value,category\nsalary,income,100,work";

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(csv_form(&[outcomes, incomes]))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(state.ledger.compute_balance().unwrap().total, 20.0);
    }

    #[tokio::test]
    async fn overdrawing_import_saves_nothing() {
        let state = get_test_state();
        state
            .ledger
            .create_transaction(TransactionRequest {
                title: "Opening".to_owned(),
                value: 100.0,
                kind: TransactionType::Income,
                category: "Opening".to_owned(),
            })
            .unwrap();
        let server = TestServer::try_new(build_router(state.clone()))
            .expect("Could not create test server.");
        let text = "title,type,value,category\nrent,outcome,80,housing\nbonus,outcome,40,work";

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(csv_form(&[text]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(state.ledger.list_transactions().unwrap().len(), 1);
        assert_eq!(state.ledger.list_categories().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_record_is_a_bad_request() {
        let server = TestServer::try_new(build_router(get_test_state()))
            .expect("Could not create test server.");
        let text = "title,type,value,category\n,,,";

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(csv_form(&[text]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_line_between_records_is_a_bad_request() {
        let state = get_test_state();
        let server = TestServer::try_new(build_router(state.clone()))
            .expect("Could not create test server.");
        let text = "title,type,value,category\n\
            rent,income,80,housing\n\
            \n\
            salary,income,50,work\n";

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(csv_form(&[text]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(state.ledger.list_transactions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_csv_file() {
        let server = TestServer::try_new(build_router(get_test_state()))
            .expect("Could not create test server.");
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(b"hello".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );

        let response = server
            .post(endpoints::IMPORT_TRANSACTIONS)
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
