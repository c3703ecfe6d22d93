//! Quote book
//!
//! The `QuoteBook` is the single owner of all mutable quote state:
//! - the quote store (durable)
//! - the conflict queue (process lifetime)
//! - the session marker (session scope)
//!
//! Front ends hold one book and call its methods; concurrent front ends
//! share it behind a mutex so every mutation is serialized.

use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::conflict::ConflictQueue;
use crate::error::QuoteResult;
use crate::merge::{self, ImportReport, MergeReport};
use crate::models::{CategoryFilter, Conflict, Decision, Quote};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, QuotePersistence, SessionMarker};
use crate::store::QuoteStore;
use crate::transfer;
use crate::ui::{CategorySink, DisplaySink};

/// All quote state for one user session
pub struct QuoteBook {
    store: QuoteStore,
    conflicts: ConflictQueue,
    session: SessionMarker,
}

impl QuoteBook {
    /// Open the book with durable records under `config.data_dir`
    /// and an in-memory session scope
    pub fn open(config: &Config) -> Self {
        Self::with_storage(
            Box::new(FileStore::new(&config.data_dir)),
            Box::new(MemoryStore::new()),
        )
    }

    /// Open the book on explicit storage scopes
    pub fn with_storage(durable: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        Self {
            store: QuoteStore::open(QuotePersistence::new(durable)),
            conflicts: ConflictQueue::new(),
            session: SessionMarker::new(session),
        }
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn conflicts(&self) -> &ConflictQueue {
        &self.conflicts
    }

    // ==================== Display ====================

    /// Pick a random quote and hand it to `sink`
    ///
    /// Uses `filter` when given, otherwise the persisted category filter.
    /// A displayed quote becomes the session's last viewed quote.
    pub fn show_random(
        &mut self,
        filter: Option<&CategoryFilter>,
        sink: &mut dyn DisplaySink,
    ) -> Option<Quote> {
        let selected;
        let filter = match filter {
            Some(filter) => filter,
            None => {
                selected = self.store.selected_category();
                &selected
            }
        };

        let quote = self.store.random_from(filter).cloned();
        sink.display(quote.as_ref());

        if let Some(ref quote) = quote {
            self.session.record(quote);
        }
        quote
    }

    /// The quote displayed most recently in this session
    pub fn last_viewed(&self) -> Option<Quote> {
        self.session.last_viewed()
    }

    // ==================== Categories ====================

    pub fn categories(&self) -> Vec<String> {
        self.store.all_categories()
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.store.selected_category()
    }

    /// Persist a new category filter and republish the choices
    pub fn select_category(&mut self, filter: CategoryFilter, sink: &mut dyn CategorySink) {
        self.store.set_selected_category(&filter);
        sink.show_categories(&self.store.all_categories(), &filter);
    }

    /// Push the current category choices to `sink`
    pub fn publish_categories(&self, sink: &mut dyn CategorySink) {
        sink.show_categories(&self.store.all_categories(), &self.store.selected_category());
    }

    // ==================== Mutations ====================

    /// Add a quote entered by the user
    pub fn add_quote(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        self.store.append(text, category)
    }

    /// Import a JSON payload, appending only new `(text, category)` pairs
    pub fn import_json(&mut self, payload: &str) -> QuoteResult<ImportReport> {
        let parsed = transfer::parse_import(payload)?;
        let mut report = merge::merge_import(&mut self.store, parsed.quotes);
        report.rejected = parsed.rejected;
        Ok(report)
    }

    /// The full collection as pretty-printed JSON
    pub fn export_json(&self) -> QuoteResult<String> {
        self.store.export_json()
    }

    /// Merge a fetched remote list and queue any conflicts for review
    pub fn apply_remote(&mut self, candidates: Vec<Quote>) -> MergeReport {
        let report = merge::merge_remote(&mut self.store, candidates);
        if !report.conflicts.is_empty() {
            debug!("Queueing {} conflicts for review", report.conflicts.len());
            self.conflicts.enqueue(report.conflicts.iter().cloned());
        }
        report
    }

    // ==================== Conflict review ====================

    pub fn resolve_conflict(&mut self, id: Uuid, decision: Decision) -> Option<Conflict> {
        self.conflicts.resolve_one(&mut self.store, id, decision)
    }

    pub fn resolve_all(&mut self, decision: Decision) -> usize {
        self.conflicts.resolve_all(&mut self.store, decision)
    }

    /// Close the review without deciding; the remote values stay applied
    pub fn dismiss_conflicts(&mut self) {
        self.conflicts.clear();
    }
}
