//! Defines the ledger store trait.

use crate::{
    Error,
    balance::Balance,
    category::{Category, CategoryTitle},
    transaction::{NewTransaction, Transaction},
};

/// Persists transactions and categories for the ledger core.
///
/// The core never holds on to a store across operations, callers that need a
/// check-then-act sequence to be atomic must serialize access to the store
/// (see [Ledger](crate::Ledger)).
pub trait LedgerStore {
    /// Get the category with exactly `title`, `None` if there is no such category.
    fn find_category_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error>;

    /// Create a new category and add it to the store.
    ///
    /// Implementers must insert-if-absent: if a category with `title` already
    /// exists, it is returned instead of creating a second one.
    fn create_category(&self, title: CategoryTitle) -> Result<Category, Error>;

    /// Create a new transaction in the store.
    fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve every transaction in the store.
    fn all_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// The totals over every transaction in the store.
    ///
    /// Implementers may override this with a cheaper query, but the result must
    /// match reducing [LedgerStore::all_transactions].
    fn balance(&self) -> Result<Balance, Error> {
        self.all_transactions()
            .map(|transactions| Balance::from_transactions(&transactions))
    }
}
