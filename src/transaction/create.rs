//! Creates single transactions while keeping the balance from going negative.

use serde::{Deserialize, Serialize};

use crate::{
    Error, ValidationError,
    balance::compute_balance,
    category::{CategoryTitle, resolve_category},
    stores::LedgerStore,
    transaction::{NewTransaction, Transaction, TransactionType},
};

/// Everything needed to create a transaction, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// A text description of the transaction, must not be empty.
    pub title: String,
    /// The amount of money, must not be negative.
    pub value: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The title of the category, created if it does not exist yet.
    pub category: String,
}

/// Check that a transaction title is not empty or only whitespace.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(())
    }
}

/// Check that a transaction value is a finite, non-negative number.
pub fn validate_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::InvalidValue(value.to_string()))
    } else if value < 0.0 {
        Err(ValidationError::NegativeValue(value))
    } else {
        Ok(())
    }
}

/// Validate `request` and save it as a new transaction in `store`.
///
/// Outcomes are rejected if they are larger than the current balance total,
/// so an outcome equal to the balance takes the total to exactly zero.
/// The category is created if needed.
///
/// Callers must hold exclusive access to `store` for the whole call and should
/// pass a store that rolls back on error (e.g. a SQL transaction) so that a
/// category created for a failed insert does not linger, see
/// [Ledger::create_transaction](crate::Ledger::create_transaction).
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the title is empty, the value is negative or the
///   category title is empty,
/// - [Error::InsufficientBalance] if an outcome is larger than the balance,
/// - or a storage error if the store cannot be read or written.
pub fn create_transaction<S>(request: TransactionRequest, store: &S) -> Result<Transaction, Error>
where
    S: LedgerStore + ?Sized,
{
    validate_title(&request.title)?;
    validate_value(request.value)?;
    let category_title = CategoryTitle::new(&request.category)?;

    if request.kind == TransactionType::Outcome {
        let balance = compute_balance(store)?;

        if request.value > balance.total {
            tracing::debug!(
                "Rejected outcome of {} with a balance of {}",
                request.value,
                balance.total
            );

            return Err(Error::InsufficientBalance {
                balance: balance.total,
                requested: request.value,
            });
        }
    }

    let category_id = resolve_category(category_title, store)?;

    let transaction = store.create_transaction(NewTransaction {
        title: request.title,
        value: request.value,
        kind: request.kind,
        category_id,
    })?;

    tracing::info!(
        "Created {} transaction {} for {}",
        transaction.kind,
        transaction.id,
        transaction.value
    );

    Ok(transaction)
}
