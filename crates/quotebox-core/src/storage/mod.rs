//! Storage layer
//!
//! Handles the durable quote record and the session-scoped marker.
//!
//! ## Architecture
//!
//! - **Durable scope**: JSON records on disk, survive restarts
//! - **Session scope**: in-memory, cleared when the process ends
//!
//! Both scopes implement [`KeyValueStore`], so tests can swap either one
//! for an in-memory or failing store.

pub mod error;
pub mod kv;
pub mod persistence;
pub mod session;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{QuotePersistence, QUOTES_KEY, SELECTED_CATEGORY_KEY};
pub use session::{SessionMarker, LAST_VIEWED_KEY};
