//! Durable persistence for the quote collection
//!
//! Records (all JSON):
//! - `quotes` - array of `{text, category}` objects
//! - `selectedCategory` - a category name or `"all"`, stored as plain text

use serde_json::Value;

use super::error::{StorageError, StorageResult};
use super::kv::KeyValueStore;
use crate::models::{CategoryFilter, Quote};

/// Key of the quote collection record
pub const QUOTES_KEY: &str = "quotes";

/// Key of the persisted category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Serializes the quote collection to and from a durable scope
pub struct QuotePersistence {
    storage: Box<dyn KeyValueStore>,
}

impl QuotePersistence {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load the stored quotes
    ///
    /// Returns `None` if nothing was ever saved, and `InvalidFormat` if the
    /// record is not a JSON array. Entries that do not project into a quote
    /// are dropped.
    pub fn load_quotes(&self) -> StorageResult<Option<Vec<Quote>>> {
        let Some(raw) = self.storage.get(QUOTES_KEY)? else {
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| StorageError::InvalidFormat {
            key: QUOTES_KEY.to_string(),
            details: e.to_string(),
        })?;

        let Value::Array(entries) = value else {
            return Err(StorageError::InvalidFormat {
                key: QUOTES_KEY.to_string(),
                details: "expected a JSON array".to_string(),
            });
        };

        Ok(Some(entries.iter().filter_map(Quote::from_value).collect()))
    }

    /// Save the full quote collection
    pub fn save_quotes(&mut self, quotes: &[Quote]) -> StorageResult<()> {
        let json = serde_json::to_string(quotes).map_err(|source| StorageError::Serialization {
            key: QUOTES_KEY.to_string(),
            source,
        })?;
        self.storage.set(QUOTES_KEY, &json)
    }

    /// Load the persisted category filter, defaulting to `All`
    pub fn load_selected_category(&self) -> StorageResult<CategoryFilter> {
        let raw = self.storage.get(SELECTED_CATEGORY_KEY)?;
        Ok(raw
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }

    /// Persist the category filter
    pub fn save_selected_category(&mut self, filter: &CategoryFilter) -> StorageResult<()> {
        self.storage.set(SELECTED_CATEGORY_KEY, filter.as_str())
    }
}
