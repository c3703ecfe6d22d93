//! Import payload parsing
//!
//! Import files are JSON arrays of objects with a string `text` and an
//! optional `category`. Export is handled by [`QuoteStore::export_json`].
//!
//! [`QuoteStore::export_json`]: crate::store::QuoteStore::export_json

use serde_json::Value;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// Quotes parsed from an import payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImport {
    /// Valid entries, in payload order
    pub quotes: Vec<Quote>,
    /// Entries that could not be projected into a quote
    pub rejected: usize,
}

/// Parse an import payload
///
/// Fails with `ImportFormat` if the payload is not JSON, not an array, or
/// has no valid entries. Otherwise invalid entries are counted and skipped.
pub fn parse_import(payload: &str) -> QuoteResult<ParsedImport> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| QuoteError::ImportFormat(format!("not valid JSON: {}", e)))?;

    let Value::Array(entries) = value else {
        return Err(QuoteError::ImportFormat(
            "expected a JSON array of quotes".to_string(),
        ));
    };

    let total = entries.len();
    let quotes: Vec<Quote> = entries.iter().filter_map(Quote::from_value).collect();

    if quotes.is_empty() {
        return Err(QuoteError::ImportFormat(
            "no entries with a text field".to_string(),
        ));
    }

    Ok(ParsedImport {
        rejected: total - quotes.len(),
        quotes,
    })
}
