//! Session marker
//!
//! Remembers the most recently displayed quote for the current session.

use tracing::warn;

use super::kv::KeyValueStore;
use crate::models::Quote;

/// Key of the last displayed quote
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// Records the last displayed quote in a session-scoped store
pub struct SessionMarker {
    storage: Box<dyn KeyValueStore>,
}

impl SessionMarker {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Overwrite the marker with `quote`
    ///
    /// Storage faults are logged and swallowed.
    pub fn record(&mut self, quote: &Quote) {
        let json = match serde_json::to_string(quote) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode last viewed quote: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(LAST_VIEWED_KEY, &json) {
            warn!("Failed to record last viewed quote: {}", e);
        }
    }

    /// The last displayed quote, if any was recorded and is still readable
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = match self.storage.get(LAST_VIEWED_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read last viewed quote: {}", e);
                return None;
            }
        };
        let value = serde_json::from_str(&raw).ok()?;
        Quote::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_record_overwrites() {
        let mut marker = SessionMarker::new(Box::new(MemoryStore::new()));
        assert!(marker.last_viewed().is_none());

        marker.record(&Quote::new("First", "a"));
        marker.record(&Quote::new("Second", "b"));

        assert_eq!(marker.last_viewed(), Some(Quote::new("Second", "b")));
    }

    #[test]
    fn test_garbage_record_is_ignored() {
        let mut storage = MemoryStore::new();
        storage.set(LAST_VIEWED_KEY, "{broken").unwrap();
        let marker = SessionMarker::new(Box::new(storage));

        assert!(marker.last_viewed().is_none());
    }
}
