//! Quote command handlers

use anyhow::{Context, Result};

use quotebox_core::{CategoryFilter, DisplaySink, QuoteBook};

use crate::editor::compose_quote;
use crate::output::Output;

/// Show a random quote
///
/// Uses `category` for this call only; without it the saved filter applies.
pub fn show(book: &mut QuoteBook, category: Option<String>, output: &mut Output) -> Result<()> {
    let filter = category.as_deref().map(parse_filter);
    book.show_random(filter.as_ref(), output);
    Ok(())
}

/// Add a quote, opening the editor when no text is given
pub fn add(
    book: &mut QuoteBook,
    text: Option<String>,
    category: String,
    output: &mut Output,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => compose_quote().context("Failed to compose quote")?,
    };

    let quote = book.add_quote(&text, &category)?;

    output.success(&format!("Added quote to '{}'", quote.category));
    if output.is_json() {
        output.display(Some(&quote));
    }
    Ok(())
}

/// List categories, marking the active filter
pub fn categories(book: &QuoteBook, output: &mut Output) -> Result<()> {
    book.publish_categories(output);
    Ok(())
}

/// Show or change the saved category filter
pub fn filter(book: &mut QuoteBook, category: Option<String>, output: &mut Output) -> Result<()> {
    let Some(category) = category else {
        book.publish_categories(output);
        return Ok(());
    };

    let filter = parse_filter(&category);
    if let CategoryFilter::Category(ref name) = filter {
        if !book.categories().contains(name) {
            output.warning(&format!("No quotes in '{}' yet", name));
        }
    }

    book.select_category(filter.clone(), output);
    output.success(&format!("Showing quotes from: {}", filter));
    Ok(())
}

fn parse_filter(value: &str) -> CategoryFilter {
    value.parse().unwrap_or_default()
}
