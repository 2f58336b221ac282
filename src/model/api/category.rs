use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::id::ApiId,
    db::category::{is_valid_slug, Category, NewCategory, MAX_NAME_LENGTH},
};

/// A category as submitted to the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub slug: String,
}

impl TryFrom<CategorySpec> for NewCategory {
    type Error = Error;

    /// Check the name and slug are acceptable.
    fn try_from(spec: CategorySpec) -> Result<Self> {
        let name = spec.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::bad_request(format!(
                "Category name must be 1 to {MAX_NAME_LENGTH} characters"
            )));
        }
        if !is_valid_slug(&spec.slug) {
            return Err(Error::bad_request(format!(
                "Illegal category slug: '{}'",
                spec.slug
            )));
        }
        Ok(Self {
            name: name.to_string(),
            slug: spec.slug,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescription {
    pub id: ApiId,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryDescription {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into(),
            name: category.category.name,
            slug: category.category.slug,
        }
    }
}
