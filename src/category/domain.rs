//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{ValidationError, database_id::CategoryId};

/// A validated, non-empty category title.
///
/// The title is the natural key of a category: two categories never share a title.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(try_from = "String")]
pub struct CategoryTitle(String);

impl CategoryTitle {
    /// Create a category title. Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return a [ValidationError::EmptyCategoryTitle] if
    /// `title` is empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        let title = title.trim();

        if title.is_empty() {
            Err(ValidationError::EmptyCategoryTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a category title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for CategoryTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryTitle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryTitle::new(s)
    }
}

impl TryFrom<String> for CategoryTitle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryTitle::new(&value)
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for grouping transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique title of the category.
    pub title: CategoryTitle,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod category_title_tests {
    use crate::{ValidationError, category::CategoryTitle};

    #[test]
    fn new_fails_on_empty_string() {
        let title = CategoryTitle::new("");

        assert_eq!(title, Err(ValidationError::EmptyCategoryTitle));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let title = CategoryTitle::new("\n\t \r");

        assert_eq!(title, Err(ValidationError::EmptyCategoryTitle));
    }

    #[test]
    fn new_trims_whitespace() {
        let title = CategoryTitle::new("  Housing ").unwrap();

        assert_eq!(title.as_ref(), "Housing");
    }

    #[test]
    fn deserialize_rejects_empty_title() {
        let title = serde_json::from_str::<CategoryTitle>("\"  \"");

        assert!(title.is_err());
    }

    #[test]
    fn deserialize_trims_whitespace() {
        let title: CategoryTitle = serde_json::from_str("\" Food \"").unwrap();

        assert_eq!(title.as_ref(), "Food");
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let title = CategoryTitle::new("🔥");

        assert!(title.is_ok())
    }
}
