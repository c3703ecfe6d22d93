//! Data models for quotebox
//!
//! Defines the core data structures: Quote, CategoryFilter and Conflict.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Category assigned when a quote has none
pub const UNCATEGORIZED: &str = "uncategorized";

/// Textual sentinel for "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// A quote with its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote text (never empty)
    pub text: String,
    /// Category used for filtering
    #[serde(default = "default_category")]
    pub category: String,
}

impl Quote {
    /// Create a new quote, defaulting an empty category to `uncategorized`
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: normalize_category(category.into()),
        }
    }

    /// Project an arbitrary JSON value into a quote
    ///
    /// Returns `None` unless the value is an object with a non-blank string
    /// `text`. Extra fields are ignored. A missing, empty or non-string
    /// `category` becomes `uncategorized`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = object.get("text")?.as_str()?;
        if text.trim().is_empty() {
            return None;
        }
        let category = object
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Some(Self::new(text, category))
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

fn normalize_category(category: String) -> String {
    if category.trim().is_empty() {
        default_category()
    } else {
        category
    }
}

/// Which quotes are eligible for display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote in the store
    #[default]
    All,
    /// Only quotes whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    /// Check whether a quote passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }

    /// The stored representation (`"all"` or the category name)
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(name) => name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote candidate that disagreed with a local quote on category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Conflict {
    /// Identifier used to resolve this conflict individually
    pub id: Uuid,
    /// The shared quote text
    pub text: String,
    /// Position of the affected quote in the store
    pub local_index: usize,
    /// The local quote as it was before the merge
    pub local: Quote,
    /// The incoming candidate
    pub server: Quote,
    /// When the conflict was detected
    pub detected_at: DateTime<Utc>,
}

impl Conflict {
    /// Create a conflict between a local snapshot and a server candidate
    pub fn new(local_index: usize, local: Quote, server: Quote) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: local.text.clone(),
            local_index,
            local,
            server,
            detected_at: Utc::now(),
        }
    }
}

/// A user's decision on a pending conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the server category (already applied by the merge)
    AcceptRemote,
    /// Restore the category the quote had before the merge
    KeepLocal,
}
