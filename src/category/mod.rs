//! Categories group transactions by what they were for, e.g. "Housing" or "Salary".
//!
//! Categories are never created directly by users. They are created the first
//! time a transaction refers to a title that the ledger has not seen before,
//! see [resolve_category].

mod db;
mod domain;
mod endpoint;
mod resolver;

pub use db::{
    create_category, create_category_table, get_all_categories, get_category_by_title,
    map_category_row_with_offset,
};
pub use domain::{Category, CategoryTitle};
pub use endpoint::get_categories_endpoint;
pub use resolver::{resolve_categories, resolve_category};
