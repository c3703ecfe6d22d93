//! Test doubles shared by unit tests

use std::io;
use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::sync::RemoteFeed;

/// Storage scope where every operation fails like a full disk
pub struct FailingStore;

impl FailingStore {
    fn error(key: &str) -> StorageError {
        StorageError::from_io(
            io::Error::new(io::ErrorKind::Other, "quota exceeded"),
            format!("{}.json", key).into(),
        )
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Err(Self::error(key))
    }

    fn set(&mut self, key: &str, _value: &str) -> StorageResult<()> {
        Err(Self::error(key))
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        Err(Self::error(key))
    }
}

/// Feed returning a fixed list
pub struct StaticFeed {
    quotes: Vec<Quote>,
}

impl StaticFeed {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }
}

impl RemoteFeed for StaticFeed {
    async fn fetch(&self) -> QuoteResult<Vec<Quote>> {
        Ok(self.quotes.clone())
    }
}

/// Feed that always fails
pub struct FailingFeed;

impl RemoteFeed for FailingFeed {
    async fn fetch(&self) -> QuoteResult<Vec<Quote>> {
        Err(QuoteError::Fetch("server returned status 503".to_string()))
    }
}

/// Feed that blocks each fetch until [`release`](Self::release) is called
pub struct GatedFeed {
    quotes: Vec<Quote>,
    gate: Arc<Notify>,
}

impl GatedFeed {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            gate: Arc::new(Notify::new()),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

impl RemoteFeed for GatedFeed {
    async fn fetch(&self) -> QuoteResult<Vec<Quote>> {
        self.gate.notified().await;
        Ok(self.quotes.clone())
    }
}
