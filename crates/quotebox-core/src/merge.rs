//! Merge engine
//!
//! Reconciles a candidate list with the quote store. Two policies exist:
//!
//! - [`merge_remote`]: remote wins. A candidate whose text matches a local
//!   quote with a different category overwrites that category right away
//!   and produces a [`Conflict`] for later review. The conflict keeps a
//!   snapshot of the local quote so the change can be reverted.
//! - [`merge_import`]: additive. Only `(text, category)` pairs not already
//!   present are appended; nothing is overwritten and no conflicts arise.
//!
//! ## Duplicate texts
//!
//! The store does not enforce unique texts. Remote lookups are keyed on text
//! and the **first** quote with a given text wins; later quotes sharing that
//! text are never compared against candidates.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::models::{Conflict, Quote};
use crate::store::QuoteStore;

/// Result of a remote merge
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeReport {
    /// Candidates appended as new quotes
    pub added: usize,
    /// Local quotes whose category was overwritten
    pub updated: usize,
    /// Conflicts raised by this merge, in candidate order
    pub conflicts: Vec<Conflict>,
}

impl MergeReport {
    /// Whether the store was modified
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Result of an import merge
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// New pairs appended
    pub added: usize,
    /// Pairs already present
    pub skipped: usize,
    /// Entries dropped while parsing the payload
    pub rejected: usize,
}

/// Merge remote candidates, letting the remote category win
pub fn merge_remote(store: &mut QuoteStore, candidates: Vec<Quote>) -> MergeReport {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, quote) in store.quotes().iter().enumerate() {
        index.entry(quote.text.clone()).or_insert(i);
    }

    let mut report = MergeReport::default();

    for candidate in candidates {
        let existing = index.get(&candidate.text).copied();
        let Some(i) = existing else {
            let text = candidate.text.clone();
            let i = store.push(candidate);
            index.insert(text, i);
            report.added += 1;
            continue;
        };

        let Some(local) = store.get(i) else {
            continue;
        };
        if local.category == candidate.category {
            continue;
        }

        if let Some(snapshot) = store.set_category(i, &candidate.category) {
            debug!(
                "Category conflict on \"{}\": local {:?}, remote {:?}",
                candidate.text, snapshot.category, candidate.category
            );
            report.updated += 1;
            report.conflicts.push(Conflict::new(i, snapshot, candidate));
        }
    }

    if report.changed() {
        store.save();
        info!(
            "Remote merge: {} added, {} updated, {} conflicts",
            report.added,
            report.updated,
            report.conflicts.len()
        );
    }

    report
}

/// Merge imported candidates, appending only unseen `(text, category)` pairs
pub fn merge_import(store: &mut QuoteStore, candidates: Vec<Quote>) -> ImportReport {
    let mut seen: HashSet<(String, String)> = store
        .quotes()
        .iter()
        .map(|q| (q.text.clone(), q.category.clone()))
        .collect();

    let mut report = ImportReport::default();

    for candidate in candidates {
        if seen.insert((candidate.text.clone(), candidate.category.clone())) {
            store.push(candidate);
            report.added += 1;
        } else {
            report.skipped += 1;
        }
    }

    if report.added > 0 {
        store.save();
        info!(
            "Import merge: {} added, {} skipped",
            report.added, report.skipped
        );
    }

    report
}
