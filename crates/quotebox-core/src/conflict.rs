//! Conflict queue
//!
//! Holds conflicts raised by remote merges until the user decides on them.
//! The queue lives only for the current process; it is never persisted.

use tracing::debug;
use uuid::Uuid;

use crate::models::{Conflict, Decision};
use crate::store::QuoteStore;

/// Ordered list of conflicts awaiting a decision
#[derive(Debug, Default)]
pub struct ConflictQueue {
    pending: Vec<Conflict>,
}

impl ConflictQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append conflicts to the end of the queue
    pub fn enqueue(&mut self, conflicts: impl IntoIterator<Item = Conflict>) {
        self.pending.extend(conflicts);
    }

    /// Conflicts still awaiting a decision, oldest first
    pub fn pending(&self) -> &[Conflict] {
        &self.pending
    }

    pub fn get(&self, id: Uuid) -> Option<&Conflict> {
        self.pending.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply `decision` to one conflict and remove it from the queue
    ///
    /// `AcceptRemote` only dismisses, since the merge already applied the
    /// remote category. `KeepLocal` writes the pre-merge category back and
    /// saves; later conflicts on the same quote were layered on top of this
    /// one, so they are undone first and settled along with it. Returns
    /// `None` if no pending conflict has this id.
    pub fn resolve_one(
        &mut self,
        store: &mut QuoteStore,
        id: Uuid,
        decision: Decision,
    ) -> Option<Conflict> {
        let position = self.pending.iter().position(|c| c.id == id)?;
        let conflict = self.pending.remove(position);

        let mut restored = false;
        if decision == Decision::KeepLocal {
            let later = self.take_later_on_text(position, &conflict.text);
            for newer in later.iter().rev() {
                restored |= apply_decision(store, newer, decision);
            }
        }
        restored |= apply_decision(store, &conflict, decision);

        if restored {
            store.save();
        }

        Some(conflict)
    }

    /// Apply `decision` to every pending conflict, then empty the queue
    ///
    /// Conflicts are undone newest first so stacked conflicts on one quote
    /// unwind back to the oldest local category. Returns the number of
    /// conflicts resolved.
    pub fn resolve_all(&mut self, store: &mut QuoteStore, decision: Decision) -> usize {
        let conflicts = std::mem::take(&mut self.pending);

        let mut restored = false;
        for conflict in conflicts.iter().rev() {
            restored |= apply_decision(store, conflict, decision);
        }
        if restored {
            store.save();
        }

        conflicts.len()
    }

    /// Drop every pending conflict without touching the store
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove pending conflicts at or after `from` that share `text`, oldest first
    fn take_later_on_text(&mut self, from: usize, text: &str) -> Vec<Conflict> {
        let mut taken = Vec::new();
        let mut i = from;
        while i < self.pending.len() {
            if self.pending[i].text == text {
                taken.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        taken
    }
}

/// Returns whether the store was modified
fn apply_decision(store: &mut QuoteStore, conflict: &Conflict, decision: Decision) -> bool {
    debug!("Resolving conflict on \"{}\": {:?}", conflict.text, decision);
    match decision {
        Decision::AcceptRemote => false,
        Decision::KeepLocal => store.restore_category(conflict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_remote;
    use crate::models::Quote;
    use crate::storage::{MemoryStore, QuotePersistence};

    fn conflicted_store() -> (QuoteStore, ConflictQueue) {
        let mut store = QuoteStore::open(QuotePersistence::new(Box::new(MemoryStore::new())));
        store.replace_all(vec![Quote::new("X", "A"), Quote::new("Y", "A")]);

        let report = merge_remote(
            &mut store,
            vec![Quote::new("X", "B"), Quote::new("Y", "C")],
        );
        let mut queue = ConflictQueue::new();
        queue.enqueue(report.conflicts);
        (store, queue)
    }

    #[test]
    fn test_enqueue_preserves_order() {
        let (_, queue) = conflicted_store();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pending()[0].text, "X");
        assert_eq!(queue.pending()[1].text, "Y");
    }

    #[test]
    fn test_accept_remote_dismisses_only() {
        let (mut store, mut queue) = conflicted_store();
        let id = queue.pending()[0].id;

        let resolved = queue.resolve_one(&mut store, id, Decision::AcceptRemote).unwrap();

        assert_eq!(resolved.text, "X");
        assert_eq!(queue.len(), 1);
        assert!(queue.get(id).is_none());
        assert_eq!(store.get(0).unwrap().category, "B");
    }

    #[test]
    fn test_keep_local_restores_category() {
        let (mut store, mut queue) = conflicted_store();
        let id = queue.pending()[1].id;

        queue.resolve_one(&mut store, id, Decision::KeepLocal).unwrap();

        assert_eq!(store.get(1).unwrap().category, "A");
        assert_eq!(store.get(0).unwrap().category, "B");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_id() {
        let (mut store, mut queue) = conflicted_store();
        assert!(queue
            .resolve_one(&mut store, Uuid::new_v4(), Decision::KeepLocal)
            .is_none());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_resolve_all_keep_local() {
        let (mut store, mut queue) = conflicted_store();

        let resolved = queue.resolve_all(&mut store, Decision::KeepLocal);

        assert_eq!(resolved, 2);
        assert!(queue.is_empty());
        assert_eq!(
            store.quotes(),
            &[Quote::new("X", "A"), Quote::new("Y", "A")]
        );
    }

    #[test]
    fn test_resolve_all_accept_remote() {
        let (mut store, mut queue) = conflicted_store();

        queue.resolve_all(&mut store, Decision::AcceptRemote);

        assert!(queue.is_empty());
        assert_eq!(
            store.quotes(),
            &[Quote::new("X", "B"), Quote::new("Y", "C")]
        );
    }

    fn stacked_conflicts() -> (QuoteStore, ConflictQueue) {
        let mut store = QuoteStore::open(QuotePersistence::new(Box::new(MemoryStore::new())));
        store.replace_all(vec![Quote::new("X", "A"), Quote::new("Y", "A")]);

        let mut queue = ConflictQueue::new();
        queue.enqueue(merge_remote(&mut store, vec![Quote::new("X", "B")]).conflicts);
        queue.enqueue(merge_remote(&mut store, vec![Quote::new("Y", "C")]).conflicts);
        queue.enqueue(merge_remote(&mut store, vec![Quote::new("X", "C")]).conflicts);
        (store, queue)
    }

    #[test]
    fn test_resolve_all_keep_local_across_syncs() {
        let (mut store, mut queue) = stacked_conflicts();
        assert_eq!(queue.len(), 3);
        assert_eq!(store.get(0).unwrap().category, "C");

        queue.resolve_all(&mut store, Decision::KeepLocal);

        assert_eq!(
            store.quotes(),
            &[Quote::new("X", "A"), Quote::new("Y", "A")]
        );
    }

    #[test]
    fn test_resolve_all_keep_local_same_batch() {
        let mut store = QuoteStore::open(QuotePersistence::new(Box::new(MemoryStore::new())));
        store.replace_all(vec![Quote::new("X", "A")]);

        let report = merge_remote(&mut store, vec![Quote::new("X", "B"), Quote::new("X", "C")]);
        assert_eq!(report.conflicts.len(), 2);
        let mut queue = ConflictQueue::new();
        queue.enqueue(report.conflicts);

        queue.resolve_all(&mut store, Decision::KeepLocal);

        assert_eq!(store.quotes(), &[Quote::new("X", "A")]);
    }

    #[test]
    fn test_keep_local_on_older_conflict_settles_later_ones() {
        let (mut store, mut queue) = stacked_conflicts();
        let oldest = queue.pending()[0].id;

        queue.resolve_one(&mut store, oldest, Decision::KeepLocal).unwrap();

        assert_eq!(store.get(0).unwrap().category, "A");
        // Only the unrelated conflict on Y is left
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pending()[0].text, "Y");
        assert_eq!(store.get(1).unwrap().category, "C");
    }

    #[test]
    fn test_keep_local_on_newer_conflict_steps_back_once() {
        let (mut store, mut queue) = stacked_conflicts();
        let newest = queue.pending()[2].id;

        queue.resolve_one(&mut store, newest, Decision::KeepLocal).unwrap();
        assert_eq!(store.get(0).unwrap().category, "B");
        assert_eq!(queue.len(), 2);

        let oldest = queue.pending()[0].id;
        queue.resolve_one(&mut store, oldest, Decision::KeepLocal).unwrap();
        assert_eq!(store.get(0).unwrap().category, "A");
    }

    #[test]
    fn test_accept_remote_on_older_conflict_leaves_later_ones() {
        let (mut store, mut queue) = stacked_conflicts();
        let oldest = queue.pending()[0].id;

        queue.resolve_one(&mut store, oldest, Decision::AcceptRemote).unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(store.get(0).unwrap().category, "C");
    }

    #[test]
    fn test_clear_has_no_side_effects() {
        let (mut store, mut queue) = conflicted_store();
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(store.get(0).unwrap().category, "B");
        assert_eq!(queue.resolve_all(&mut store, Decision::KeepLocal), 0);
        assert_eq!(store.get(0).unwrap().category, "B");
    }
}
