//! Maps category titles to category IDs, creating categories on first use.

use std::collections::{BTreeSet, HashMap};

use crate::{Error, category::CategoryTitle, database_id::CategoryId, stores::LedgerStore};

/// Get the ID of the category titled `title`, creating the category if it does not exist.
///
/// A missing category is not an error, it is how categories get created.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn resolve_category<S>(title: CategoryTitle, store: &S) -> Result<CategoryId, Error>
where
    S: LedgerStore + ?Sized,
{
    if let Some(category) = store.find_category_by_title(&title)? {
        return Ok(category.id);
    }

    let category = store.create_category(title)?;
    tracing::info!("Created category \"{}\" ({})", category.title, category.id);

    Ok(category.id)
}

/// Resolve many category titles at once.
///
/// `titles` may contain duplicates, each distinct title is looked up (and
/// created if needed) exactly once.
///
/// # Errors
/// Returns an error if the store cannot be read or written. Categories
/// resolved before the error are not rolled back.
pub fn resolve_categories<S, I>(
    titles: I,
    store: &S,
) -> Result<HashMap<CategoryTitle, CategoryId>, Error>
where
    S: LedgerStore + ?Sized,
    I: IntoIterator<Item = CategoryTitle>,
{
    let distinct_titles: BTreeSet<CategoryTitle> = titles.into_iter().collect();
    let mut category_ids = HashMap::with_capacity(distinct_titles.len());

    for title in distinct_titles {
        let id = resolve_category(title.clone(), store)?;
        category_ids.insert(title, id);
    }

    Ok(category_ids)
}
