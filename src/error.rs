//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::transaction::Transaction;

/// Input that was rejected before anything touched the ledger.
///
/// These are always the caller's fault and can be fixed by correcting the input.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// A transaction was given an empty (or whitespace only) title.
    #[error("transaction title cannot be empty")]
    EmptyTitle,

    /// A transaction was given a value below zero.
    ///
    /// The direction of money is expressed by the transaction type, not the sign.
    #[error("transaction value cannot be negative, got {0}")]
    NegativeValue(f64),

    /// The value could not be understood as a finite number.
    #[error("\"{0}\" is not a valid transaction value")]
    InvalidValue(String),

    /// The transaction type was neither `income` nor `outcome`.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"outcome\"")]
    InvalidTransactionType(String),

    /// An empty string was used as a category title.
    #[error("category title cannot be empty")]
    EmptyCategoryTitle,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller supplied malformed input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A single row of an import was rejected.
    ///
    /// `row` is the 1-based position of the row in the import, not counting
    /// the header.
    #[error("row {row}: {error}")]
    InvalidRecord {
        /// The 1-based data row that failed validation.
        row: usize,
        /// Why the row was rejected.
        error: ValidationError,
    },

    /// Committing the outcome(s) would leave the ledger with a negative total.
    ///
    /// For a single transaction `requested` is the outcome value, for an
    /// import it is the amount the whole batch would take out of the balance.
    #[error("cannot make outcomes greater than your balance: requested {requested} but the balance is {balance}")]
    InsufficientBalance {
        /// The balance total when the check was made.
        balance: f64,
        /// The amount that would have been taken out of the balance.
        requested: f64,
    },

    /// A CSV record had every field missing.
    #[error("missing field in CSV on row {row}")]
    MalformedRecord {
        /// The 1-based data row, not counting the header.
        row: usize,
    },

    /// The CSV data could not be read at all.
    #[error("could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The multipart form could not be read as a CSV file upload.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("file is not a CSV")]
    NotCSV,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking ledger operation panicked or was cancelled before it finished.
    #[error("a background task failed: {0}")]
    BackgroundTaskError(String),

    /// The import passed validation but a row could not be persisted.
    ///
    /// The rows in `committed` were written before the failure and are not
    /// rolled back, the caller decides how to reconcile them.
    #[error("import failed on row {failed_row} after {} rows were saved: {source}", committed.len())]
    PartialImport {
        /// The transactions that were saved before the failure, in input order.
        committed: Vec<Transaction>,
        /// The 1-based data row that could not be saved.
        failed_row: usize,
        /// The storage error that stopped the import.
        source: Box<Error>,
    },
}

impl Error {
    /// Whether this error is a failure of the underlying store rather than
    /// something the caller can fix.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::SqlError(_) | Error::DatabaseLockError)
    }
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
        let status = match &self {
            Error::Validation(_)
            | Error::InvalidRecord { .. }
            | Error::InsufficientBalance { .. }
            | Error::MalformedRecord { .. }
            | Error::InvalidCSV(_)
            | Error::MultipartError(_)
            | Error::NotCSV => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::BackgroundTaskError(_)
            | Error::PartialImport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Error::PartialImport {
                committed,
                failed_row,
                ..
            } => {
                tracing::error!("Import stopped part way: {}", self);
                json!({
                    "error": "Import failed part way through, some transactions were saved.",
                    "committed": committed,
                    "failed_row": failed_row,
                })
            }
            // Internal details are only meant for the server logs.
            error if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                json!({ "error": "An unexpected error occurred, check the server logs for more details." })
            }
            error => json!({ "error": error.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, ValidationError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::from(ValidationError::EmptyTitle).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn insufficient_balance_is_a_bad_request() {
        let response = Error::InsufficientBalance {
            balance: 10.0,
            requested: 20.0,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_are_internal_server_errors() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn background_task_errors_are_internal_server_errors() {
        let response = Error::BackgroundTaskError("task panicked".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn partial_import_is_an_internal_server_error() {
        let response = Error::PartialImport {
            committed: Vec::new(),
            failed_row: 1,
            source: Box::new(Error::SqlError(rusqlite::Error::InvalidQuery)),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
