//! The import pipeline: parse, check the batch against the balance, resolve
//! categories, then save each row.

use crate::{
    Error, ValidationError,
    balance::compute_balance,
    category::{CategoryTitle, resolve_categories},
    csv_import::ImportRecord,
    stores::LedgerStore,
    transaction::{NewTransaction, Transaction, TransactionType, validate_title, validate_value},
};

/// A record that passed row level validation.
#[derive(Debug, Clone, PartialEq)]
struct ParsedRecord {
    title: String,
    kind: TransactionType,
    value: f64,
    category: String,
}

impl ParsedRecord {
    /// The change this record makes to the balance total.
    fn delta(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.value,
            TransactionType::Outcome => -self.value,
        }
    }
}

/// Import `records` into `store`, returning the saved transactions in input order.
///
/// Rows are numbered from 1, not counting the CSV header. The batch goes through
/// these stages, and nothing is written until the first three have passed:
/// 1. Parsing: a record with every field empty is malformed. Every other
///    record must have a title, a valid type and a non-negative value.
/// 2. Balance: the net effect of all rows is added to the current total. The
///    batch is rejected if the result is negative. Individual rows are not
///    checked, so an outcome may be covered by an income later in the batch.
/// 3. Categories: every row needs a category title. Each distinct title is
///    resolved once, creating the categories that do not exist yet.
/// 4. Persistence: each row is saved in input order.
///
/// Callers must hold exclusive access to `store` for the whole call.
///
/// # Errors
/// This function will return a:
/// - [Error::MalformedRecord] if a record has every field empty,
/// - [Error::InvalidRecord] if a record has an invalid title, type, value or category,
/// - [Error::InsufficientBalance] if the batch would make the balance negative,
/// - [Error::PartialImport] if a row could not be saved, carrying the rows saved before it,
/// - or a storage error if the store could not be read or categories could not be saved.
pub fn import_batch<S>(records: Vec<ImportRecord>, store: &S) -> Result<Vec<Transaction>, Error>
where
    S: LedgerStore + ?Sized,
{
    if let Some(index) = records.iter().position(ImportRecord::is_empty) {
        return Err(Error::MalformedRecord { row: index + 1 });
    }

    let parsed = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_record(record, index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let import_delta: f64 = parsed.iter().map(ParsedRecord::delta).sum();
    let balance = compute_balance(store)?;

    if balance.total + import_delta < 0.0 {
        tracing::debug!(
            "Rejected import of {} rows: balance {} with import total {}",
            parsed.len(),
            balance.total,
            import_delta
        );

        return Err(Error::InsufficientBalance {
            balance: balance.total,
            requested: -import_delta,
        });
    }

    // All titles are checked before any category is created.
    let category_titles = parsed
        .iter()
        .enumerate()
        .map(|(index, record)| {
            CategoryTitle::new(&record.category).map_err(|error| Error::InvalidRecord {
                row: index + 1,
                error,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let category_ids = resolve_categories(category_titles.iter().cloned(), store)?;

    let mut committed = Vec::with_capacity(parsed.len());

    for (index, (record, category_title)) in parsed.into_iter().zip(&category_titles).enumerate() {
        let new_transaction = NewTransaction {
            title: record.title,
            value: record.value,
            kind: record.kind,
            category_id: category_ids[category_title],
        };

        match store.create_transaction(new_transaction) {
            Ok(transaction) => committed.push(transaction),
            Err(error) => {
                tracing::error!(
                    "Import failed on row {} after saving {} rows: {error}",
                    index + 1,
                    committed.len()
                );

                return Err(Error::PartialImport {
                    committed,
                    failed_row: index + 1,
                    source: Box::new(error),
                });
            }
        }
    }

    tracing::info!("Imported {} transactions", committed.len());

    Ok(committed)
}

fn parse_record(record: ImportRecord, row: usize) -> Result<ParsedRecord, Error> {
    let invalid = |error| Error::InvalidRecord { row, error };

    validate_title(&record.title).map_err(invalid)?;
    let kind = record.kind.parse::<TransactionType>().map_err(invalid)?;
    let value = record
        .value
        .parse::<f64>()
        .map_err(|_| invalid(ValidationError::InvalidValue(record.value.clone())))?;
    validate_value(value).map_err(invalid)?;

    Ok(ParsedRecord {
        title: record.title,
        kind,
        value,
        category: record.category,
    })
}
