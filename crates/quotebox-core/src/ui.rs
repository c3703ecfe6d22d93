//! Presentation collaborators
//!
//! The core never renders anything itself. Front ends implement these
//! traits and pass them into [`QuoteBook`](crate::book::QuoteBook) calls.

use std::fmt;

use crate::models::{CategoryFilter, Quote};

/// How prominent a notification is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Shows a quote, or an empty state when there is none
pub trait DisplaySink {
    fn display(&mut self, quote: Option<&Quote>);
}

/// Shows the category choices and the active filter
pub trait CategorySink {
    fn show_categories(&mut self, categories: &[String], selected: &CategoryFilter);
}

/// Shows status messages
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}
