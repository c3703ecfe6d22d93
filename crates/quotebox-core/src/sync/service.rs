//! Single-flight sync
//!
//! Fetches the remote feed outside the book lock, then merges under it.
//! Only one sync runs at a time; a request made while one is in flight is
//! skipped rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::feed::RemoteFeed;
use crate::book::QuoteBook;
use crate::error::{QuoteError, QuoteResult};
use crate::merge::MergeReport;

/// Current state of the sync service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No sync running
    Idle,
    /// Waiting on the remote feed
    Fetching,
    /// Applying fetched quotes to the book
    Merging,
    /// The last sync failed
    Error,
}

/// What a sync request did
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The feed was fetched and merged
    Completed {
        /// Records received from the feed
        fetched: usize,
        report: MergeReport,
    },
    /// Another sync was already running
    Skipped,
}

/// Syncs a [`QuoteBook`] with a remote feed
pub struct SyncService<F> {
    feed: F,
    timeout: Duration,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
    status_rx: watch::Receiver<SyncStatus>,
}

impl<F: RemoteFeed> SyncService<F> {
    /// Create a service; each fetch is abandoned after `timeout`
    pub fn new(feed: F, timeout: Duration) -> Self {
        let (status, status_rx) = watch::channel(SyncStatus::Idle);
        Self {
            feed,
            timeout,
            in_flight: AtomicBool::new(false),
            status,
            status_rx,
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn status(&self) -> SyncStatus {
        *self.status_rx.borrow()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch the feed and merge it into `book`
    ///
    /// Returns `Skipped` if a sync is already running. On fetch failure the
    /// book is left untouched and the error is returned.
    pub async fn perform_sync(&self, book: &Mutex<QuoteBook>) -> QuoteResult<SyncOutcome> {
        let Some(_flight) = InFlight::acquire(&self.in_flight) else {
            debug!("Sync already in progress, skipping");
            return Ok(SyncOutcome::Skipped);
        };

        self.set_status(SyncStatus::Fetching);
        let quotes = match tokio::time::timeout(self.timeout, self.feed.fetch()).await {
            Ok(Ok(quotes)) => quotes,
            Ok(Err(e)) => {
                warn!("Sync failed: {}", e);
                self.set_status(SyncStatus::Error);
                return Err(e);
            }
            Err(_) => {
                warn!("Sync timed out after {:?}", self.timeout);
                self.set_status(SyncStatus::Error);
                return Err(QuoteError::Fetch(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f32()
                )));
            }
        };

        self.set_status(SyncStatus::Merging);
        let fetched = quotes.len();
        let report = book.lock().await.apply_remote(quotes);
        self.set_status(SyncStatus::Idle);

        info!(
            "Sync complete: fetched={}, added={}, conflicts={}",
            fetched,
            report.added,
            report.conflicts.len()
        );
        Ok(SyncOutcome::Completed { fetched, report })
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.status.send(status);
    }
}

/// Holds the in-flight flag for the duration of one sync
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
