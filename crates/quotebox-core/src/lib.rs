//! Quotebox Core Library
//!
//! This crate provides the core of Quotebox, a categorized quote widget:
//! a persisted quote list, a category index, random selection, and a
//! remote sync that merges server quotes and queues conflicts for review.
//!
//! # Architecture
//!
//! - **Keyed JSON storage**: one durable scope on disk and one session scope
//!   in memory, both behind [`KeyValueStore`]
//! - **Remote wins**: sync applies server categories immediately and keeps a
//!   snapshot of the local entry so the user can restore it
//!
//! Front ends receive output through the traits in [`ui`] and never touch
//! storage directly.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut book = QuoteBook::open(&config);
//!
//! book.add_quote("Stay hungry.", "motivation")?;
//! book.show_random(Some(&"motivation".parse()?), &mut output);
//! ```
//!
//! # Modules
//!
//! - `book`: Application facade (main entry point)
//! - `store`: The quote list, category index and random selection
//! - `merge`: Remote and import merge rules
//! - `conflict`: Pending conflicts and their resolution
//! - `storage`: Durable and session persistence
//! - `sync`: Remote feed, single-flight sync and polling
//! - `config`: Application configuration

pub mod book;
pub mod config;
pub mod conflict;
pub mod error;
pub mod merge;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod ui;

#[cfg(test)]
mod testing;

pub use book::QuoteBook;
pub use config::Config;
pub use conflict::ConflictQueue;
pub use error::{QuoteError, QuoteResult};
pub use merge::{ImportReport, MergeReport};
pub use models::{CategoryFilter, Conflict, Decision, Quote, ALL_CATEGORIES, UNCATEGORIZED};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::QuoteStore;
pub use sync::{HttpFeed, RemoteFeed, SyncOutcome, SyncService, SyncStatus};
pub use ui::{CategorySink, DisplaySink, Notifier, Severity};
