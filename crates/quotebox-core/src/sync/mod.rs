//! Remote sync
//!
//! Pulls quotes from a remote feed and merges them into the book with the
//! remote-wins policy, queueing conflicts for review.
//!
//! ## Usage
//!
//! ```ignore
//! let feed = HttpFeed::new(url, config.fetch_timeout())?;
//! let service = SyncService::new(feed, config.fetch_timeout());
//! match service.perform_sync(&book).await? {
//!     SyncOutcome::Completed { report, .. } => review(report.conflicts),
//!     SyncOutcome::Skipped => {}
//! }
//! ```

mod feed;
mod poller;
mod service;

pub use feed::{parse_feed, HttpFeed, RemoteFeed};
pub use poller::{spawn_sync_poller, PollCommand, PollEvent, PollerHandle};
pub use service::{SyncOutcome, SyncService, SyncStatus};
