//! Category catalog
//!
//! Expenses carry a category key; reports show the display name. Keys the
//! catalog does not know are shown as-is.

use serde::{Deserialize, Serialize};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub key: String,
    pub name: String,
}

impl CategoryInfo {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Lookup from category key to display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: Vec<CategoryInfo>,
}

const DEFAULT_CATEGORIES: [(&str, &str); 9] = [
    ("food", "Food & Dining"),
    ("transport", "Transportation"),
    ("shopping", "Shopping"),
    ("entertainment", "Entertainment"),
    ("bills", "Bills & Utilities"),
    ("healthcare", "Healthcare"),
    ("education", "Education"),
    ("travel", "Travel"),
    ("other", "Other"),
];

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(key, name)| CategoryInfo::new(*key, *name))
                .collect(),
        }
    }
}

impl CategoryCatalog {
    /// Build a catalog from explicit entries
    pub fn from_entries(categories: Vec<CategoryInfo>) -> Self {
        Self { categories }
    }

    /// Find an entry by key
    pub fn get(&self, key: &str) -> Option<&CategoryInfo> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Display name for a key, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|c| c.name.as_str()).unwrap_or(key)
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[CategoryInfo] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_names() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.display_name("food"), "Food & Dining");
        assert_eq!(catalog.display_name("bills"), "Bills & Utilities");
        assert_eq!(catalog.entries().len(), 9);
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.display_name("pets"), "pets");
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = CategoryCatalog::from_entries(vec![CategoryInfo::new("pets", "Pet Care")]);
        assert_eq!(catalog.display_name("pets"), "Pet Care");
        assert_eq!(catalog.display_name("food"), "food");
    }
}
