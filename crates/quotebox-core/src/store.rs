//! Quote store
//!
//! The `QuoteStore` owns the quote collection and writes every mutation
//! through to the durable scope.
//!
//! ## Persistence faults
//!
//! Storage failures never propagate out of the store. They are logged and
//! the in-memory collection stays the source of truth for the session.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open(QuotePersistence::new(Box::new(FileStore::new(dir))));
//!
//! store.append("Simplicity is prerequisite for reliability.", "engineering")?;
//! let quote = store.random_from(&CategoryFilter::All);
//! ```

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{QuoteError, QuoteResult};
use crate::models::{CategoryFilter, Conflict, Quote};
use crate::storage::{QuotePersistence, StorageError};

/// Quotes used when nothing has been persisted yet
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to get started is to quit talking and begin doing.",
            "motivation",
        ),
        Quote::new("Simplicity is prerequisite for reliability.", "engineering"),
        Quote::new(
            "Life is what happens when you're busy making other plans.",
            "life",
        ),
    ]
}

/// The quote collection and its durable write-through
pub struct QuoteStore {
    /// Insertion-ordered quotes; cleared and refilled, never swapped out
    quotes: Vec<Quote>,
    persistence: QuotePersistence,
}

impl QuoteStore {
    /// Open the store, loading persisted quotes or falling back to the seed list
    pub fn open(persistence: QuotePersistence) -> Self {
        let mut store = Self {
            quotes: seed_quotes(),
            persistence,
        };

        if store.load() {
            debug!("Loaded {} quotes from durable storage", store.len());
        } else {
            info!("No stored quotes found, starting from seed list");
        }

        store
    }

    /// Reload quotes from durable storage
    ///
    /// Leaves the current contents untouched when the record is missing or
    /// malformed. Returns whether the contents were replaced.
    pub fn load(&mut self) -> bool {
        match self.persistence.load_quotes() {
            Ok(Some(quotes)) => {
                self.quotes.clear();
                self.quotes.extend(quotes);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Ignoring stored quotes: {}", e);
                false
            }
        }
    }

    /// Write the full collection to durable storage
    ///
    /// Returns `false` if the write failed; the failure is logged.
    pub fn save(&mut self) -> bool {
        match self.persistence.save_quotes(&self.quotes) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save quotes: {}", e);
                if let Some(hint) = e.recovery_suggestion() {
                    warn!("{}", hint);
                }
                false
            }
        }
    }

    /// Add a quote entered by the user
    ///
    /// Text and category are trimmed. Blank text is rejected without
    /// touching the store; a blank category becomes `uncategorized`.
    pub fn append(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation(
                "quote text must not be empty".to_string(),
            ));
        }

        let quote = Quote::new(text, category.trim());
        self.quotes.push(quote.clone());
        self.save();
        Ok(quote)
    }

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct categories, sorted
    pub fn all_categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Pick a quote uniformly at random from those matching `filter`
    pub fn random_from(&self, filter: &CategoryFilter) -> Option<&Quote> {
        self.random_from_with(filter, &mut rand::thread_rng())
    }

    /// Like [`random_from`](Self::random_from) with a caller-supplied RNG
    pub fn random_from_with<R: Rng + ?Sized>(
        &self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Option<&Quote> {
        let pool: Vec<&Quote> = self.quotes.iter().filter(|q| filter.matches(q)).collect();
        pool.choose(rng).copied()
    }

    /// Persisted category filter, `All` when unset or unreadable
    pub fn selected_category(&self) -> CategoryFilter {
        self.persistence
            .load_selected_category()
            .unwrap_or_else(|e| {
                warn!("Failed to read selected category: {}", e);
                CategoryFilter::All
            })
    }

    /// Persist the category filter
    pub fn set_selected_category(&mut self, filter: &CategoryFilter) {
        if let Err(e) = self.persistence.save_selected_category(filter) {
            warn!("Failed to save selected category: {}", e);
        }
    }

    /// Replace every quote, keeping the same underlying collection
    pub fn replace_all(&mut self, quotes: impl IntoIterator<Item = Quote>) {
        self.quotes.clear();
        self.quotes.extend(quotes);
        self.save();
    }

    /// The whole collection as a pretty-printed JSON array
    pub fn export_json(&self) -> QuoteResult<String> {
        serde_json::to_string_pretty(&self.quotes).map_err(|source| {
            QuoteError::Storage(StorageError::Serialization {
                key: "export".to_string(),
                source,
            })
        })
    }

    /// Append without saving; callers batch the save
    pub(crate) fn push(&mut self, quote: Quote) -> usize {
        self.quotes.push(quote);
        self.quotes.len() - 1
    }

    /// Change a quote's category without saving, returning the prior quote
    pub(crate) fn set_category(&mut self, index: usize, category: &str) -> Option<Quote> {
        let quote = self.quotes.get_mut(index)?;
        let previous = quote.clone();
        quote.category = category.to_string();
        Some(previous)
    }

    /// Put back the pre-merge category recorded in `conflict`, without saving
    ///
    /// Only touches a quote that still has the conflict's text and server
    /// category. Prefers the recorded index and falls back to a search by
    /// text. Returns whether a quote was restored.
    pub(crate) fn restore_category(&mut self, conflict: &Conflict) -> bool {
        let still_conflicted =
            |q: &Quote| q.text == conflict.text && q.category == conflict.server.category;

        let index = match self.quotes.get(conflict.local_index) {
            Some(q) if still_conflicted(q) => Some(conflict.local_index),
            _ => self.quotes.iter().position(still_conflicted),
        };

        match index {
            Some(i) => {
                self.quotes[i].category = conflict.local.category.clone();
                true
            }
            None => {
                warn!(
                    "Cannot keep local category for \"{}\": quote changed since the conflict",
                    conflict.text
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, KeyValueStore, MemoryStore, QUOTES_KEY};
    use crate::testing::FailingStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn memory_store() -> QuoteStore {
        QuoteStore::open(QuotePersistence::new(Box::new(MemoryStore::new())))
    }

    fn store_with(quotes: Vec<Quote>) -> QuoteStore {
        let mut store = memory_store();
        store.replace_all(quotes);
        store
    }

    fn file_store(temp_dir: &TempDir) -> QuoteStore {
        QuoteStore::open(QuotePersistence::new(Box::new(FileStore::new(
            temp_dir.path(),
        ))))
    }

    #[test]
    fn test_open_seeds_when_empty() {
        let store = memory_store();
        assert_eq!(store.quotes(), seed_quotes().as_slice());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let quotes = vec![
            Quote::new("One", "a"),
            Quote::new("Two", "b"),
            Quote::new("One", "c"),
        ];

        {
            let mut store = file_store(&temp_dir);
            store.replace_all(quotes.clone());
        }

        let reopened = file_store(&temp_dir);
        assert_eq!(reopened.quotes(), quotes.as_slice());
    }

    #[test]
    fn test_load_ignores_malformed_record() {
        let mut storage = MemoryStore::new();
        storage.set(QUOTES_KEY, r#"{"not": "a list"}"#).unwrap();

        let store = QuoteStore::open(QuotePersistence::new(Box::new(storage)));
        assert_eq!(store.quotes(), seed_quotes().as_slice());
    }

    #[test]
    fn test_append_persists() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = file_store(&temp_dir);
            let quote = store.append("  Ship it.  ", "").unwrap();
            assert_eq!(quote, Quote::new("Ship it.", "uncategorized"));
        }

        let reopened = file_store(&temp_dir);
        assert_eq!(reopened.len(), seed_quotes().len() + 1);
        assert_eq!(reopened.quotes().last().unwrap().text, "Ship it.");
    }

    #[test]
    fn test_append_rejects_blank_text() {
        let mut store = memory_store();
        let before = store.len();

        let err = store.append("", "cat").unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));

        let err = store.append("   \n", "cat").unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));

        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_storage_failure_keeps_memory() {
        let mut store = QuoteStore::open(QuotePersistence::new(Box::new(FailingStore)));
        assert_eq!(store.len(), seed_quotes().len());

        store.append("Still here", "resilience").unwrap();
        assert!(!store.save());
        assert_eq!(store.len(), seed_quotes().len() + 1);
        assert_eq!(store.selected_category(), CategoryFilter::All);
    }

    #[test]
    fn test_all_categories_sorted_and_unique() {
        let store = store_with(vec![
            Quote::new("1", "zen"),
            Quote::new("2", "art"),
            Quote::new("3", "zen"),
            Quote::new("4", "Art"),
        ]);

        assert_eq!(store.all_categories(), vec!["Art", "art", "zen"]);
    }

    #[test]
    fn test_random_from_respects_filter() {
        let store = store_with(vec![
            Quote::new("1", "a"),
            Quote::new("2", "b"),
            Quote::new("3", "a"),
        ]);
        let filter = CategoryFilter::Category("a".to_string());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let quote = store.random_from_with(&filter, &mut rng).unwrap();
            assert_eq!(quote.category, "a");
        }
    }

    #[test]
    fn test_random_from_empty_pool() {
        let store = store_with(vec![Quote::new("1", "a")]);
        let filter = CategoryFilter::Category("missing".to_string());
        assert!(store.random_from(&filter).is_none());

        let empty = store_with(Vec::new());
        assert!(empty.random_from(&CategoryFilter::All).is_none());
    }

    #[test]
    fn test_random_from_is_uniform() {
        let store = store_with(vec![
            Quote::new("1", "a"),
            Quote::new("2", "b"),
            Quote::new("3", "c"),
            Quote::new("4", "d"),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 40_000;
        let mut counts = [0usize; 4];

        for _ in 0..draws {
            let quote = store
                .random_from_with(&CategoryFilter::All, &mut rng)
                .unwrap();
            let index = store.quotes().iter().position(|q| q == quote).unwrap();
            counts[index] += 1;
        }

        for count in counts {
            let frequency = count as f64 / draws as f64;
            assert!((frequency - 0.25).abs() < 0.02, "frequency {}", frequency);
        }
    }

    #[test]
    fn test_selected_category_persists() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = file_store(&temp_dir);
            store.set_selected_category(&CategoryFilter::Category("life".into()));
        }

        let reopened = file_store(&temp_dir);
        assert_eq!(
            reopened.selected_category(),
            CategoryFilter::Category("life".into())
        );
    }

    #[test]
    fn test_export_json_is_pretty_array() {
        let store = store_with(vec![Quote::new("X", "y")]);
        let json = store.export_json().unwrap();

        assert!(json.contains('\n'));
        let parsed: Vec<Quote> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![Quote::new("X", "y")]);
    }

    #[test]
    fn test_restore_category_falls_back_to_search() {
        let mut store = store_with(vec![Quote::new("pad", "p"), Quote::new("X", "B")]);
        let conflict = Conflict::new(0, Quote::new("X", "A"), Quote::new("X", "B"));

        assert!(store.restore_category(&conflict));
        assert_eq!(store.get(1).unwrap().category, "A");
        assert_eq!(store.get(0).unwrap().category, "p");
    }

    #[test]
    fn test_restore_category_skips_changed_quote() {
        let mut store = store_with(vec![Quote::new("X", "C")]);
        let conflict = Conflict::new(0, Quote::new("X", "A"), Quote::new("X", "B"));

        assert!(!store.restore_category(&conflict));
        assert_eq!(store.get(0).unwrap().category, "C");
    }
}
