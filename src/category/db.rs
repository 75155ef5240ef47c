//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryTitle},
};

/// Create a category, or return the existing one if `title` is already taken.
///
/// The insert and the lookup happen against the `UNIQUE` title column, so two
/// callers racing on the same unseen title end up with the same category.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_category(title: CategoryTitle, connection: &Connection) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (title, created_at, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(title) DO NOTHING;",
        (title.as_ref(), now, now),
    )?;

    connection
        .prepare("SELECT id, title, created_at, updated_at FROM category WHERE title = :title;")?
        .query_row(&[(":title", title.as_ref())], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a category by its exact title, `None` if no category has that title.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_category_by_title(
    title: &CategoryTitle,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, title, created_at, updated_at FROM category WHERE title = :title;")?
        .query_row(&[(":title", title.as_ref())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by title.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, title, created_at, updated_at FROM category ORDER BY title ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
        (),
    )?;

    Ok(())
}

/// Map the four category columns starting at `offset` to a [Category].
pub fn map_category_row_with_offset(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_title: String = row.get(offset + 1)?;
    let title = CategoryTitle::new_unchecked(&raw_title);
    let created_at = row.get(offset + 2)?;
    let updated_at = row.get(offset + 3)?;

    Ok(Category {
        id,
        title,
        created_at,
        updated_at,
    })
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_with_offset(row, 0)
}
