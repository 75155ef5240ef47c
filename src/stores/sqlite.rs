//! Implements the ledger store for a SQLite connection.
//!
//! The store works on a borrowed [Connection], so it can also be driven
//! through a [rusqlite::Transaction] by dereferencing it.

use rusqlite::Connection;

use crate::{
    Error,
    balance::{Balance, get_balance},
    category::{Category, CategoryTitle, create_category, get_category_by_title},
    stores::LedgerStore,
    transaction::{NewTransaction, Transaction, get_all_transactions, insert_transaction},
};

impl LedgerStore for Connection {
    fn find_category_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error> {
        get_category_by_title(title, self)
    }

    fn create_category(&self, title: CategoryTitle) -> Result<Category, Error> {
        create_category(title, self)
    }

    fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        insert_transaction(transaction, self)
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        get_all_transactions(self)
    }

    fn balance(&self) -> Result<Balance, Error> {
        get_balance(self)
    }
}

#[cfg(test)]
mod sqlite_store_tests {
    use rusqlite::Connection;

    use crate::{
        balance::Balance,
        category::CategoryTitle,
        db::initialize,
        stores::LedgerStore,
        transaction::{NewTransaction, TransactionType},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn balance_query_matches_reducing_all_transactions() {
        let conn = get_test_connection();
        let category = conn
            .create_category(CategoryTitle::new_unchecked("Misc"))
            .unwrap();
        let rows = [
            (TransactionType::Income, 150.25),
            (TransactionType::Outcome, 20.5),
            (TransactionType::Income, 0.75),
            (TransactionType::Outcome, 99.0),
        ];
        for (kind, value) in rows {
            conn.create_transaction(NewTransaction {
                title: "test".to_owned(),
                value,
                kind,
                category_id: category.id,
            })
            .unwrap();
        }

        let from_query = conn.balance().unwrap();
        let from_rows = Balance::from_transactions(&conn.all_transactions().unwrap());

        assert_eq!(from_query, from_rows);
        assert_eq!(from_query.total, from_query.income - from_query.outcome);
        assert_eq!(from_query.total, 31.5);
    }

    #[test]
    fn balance_query_rounds_like_reducing_all_transactions() {
        let conn = get_test_connection();
        let category = conn
            .create_category(CategoryTitle::new_unchecked("Misc"))
            .unwrap();
        // Compensated summation would keep the small values that a plain sum loses.
        for value in [0.1, 0.2, 0.3, 1e16, 1.0] {
            conn.create_transaction(NewTransaction {
                title: "test".to_owned(),
                value,
                kind: TransactionType::Income,
                category_id: category.id,
            })
            .unwrap();
        }

        let from_query = conn.balance().unwrap();
        let from_rows = Balance::from_transactions(&conn.all_transactions().unwrap());

        assert_eq!(from_query, from_rows);
    }

    #[test]
    fn find_category_by_title_returns_none_for_unseen_title() {
        let conn = get_test_connection();

        let got = conn.find_category_by_title(&CategoryTitle::new_unchecked("Nope"));

        assert_eq!(got, Ok(None));
    }
}
