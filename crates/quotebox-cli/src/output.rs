//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! `Output` is also the CLI's implementation of the core display traits,
//! so the book renders quotes and categories through it directly.

use serde::Serialize;

use quotebox_core::{CategoryFilter, CategorySink, Conflict, DisplaySink, Notifier, Quote, Severity};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if we should prompt the user
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print one pending conflict for review
    pub fn print_conflict(&self, position: usize, total: usize, conflict: &Conflict) {
        match self.format {
            OutputFormat::Human => {
                println!();
                println!("Conflict {} of {}", position, total);
                println!("  Quote:  {}", truncate(&conflict.text, 70));
                println!("  Local:  {}", conflict.local.category);
                println!("  Server: {} (applied)", conflict.server.category);
            }
            OutputFormat::Json => print_json(conflict),
            OutputFormat::Quiet => println!("{}", conflict.id),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.notify(message, Severity::Success);
    }

    /// Print an informational message
    pub fn message(&self, message: &str) {
        self.notify(message, Severity::Info);
    }

    /// Print a warning to stderr
    pub fn warning(&self, message: &str) {
        self.notify(message, Severity::Warning);
    }
}

impl DisplaySink for Output {
    fn display(&mut self, quote: Option<&Quote>) {
        match (self.format, quote) {
            (OutputFormat::Human, Some(quote)) => {
                println!();
                println!("  \"{}\"", quote.text);
                println!("      [{}]", quote.category);
                println!();
            }
            (OutputFormat::Human, None) => {
                println!("No quotes available in this category.");
            }
            (OutputFormat::Json, Some(quote)) => print_json(quote),
            (OutputFormat::Json, None) => println!("null"),
            (OutputFormat::Quiet, Some(quote)) => println!("{}", quote.text),
            (OutputFormat::Quiet, None) => {}
        }
    }
}

impl CategorySink for Output {
    fn show_categories(&mut self, categories: &[String], selected: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                let marker = |active: bool| if active { "*" } else { " " };
                println!("{} all", marker(*selected == CategoryFilter::All));
                for category in categories {
                    let active = matches!(selected, CategoryFilter::Category(c) if c == category);
                    println!("{} {}", marker(active), category);
                }
                println!("\n{} categor{}", categories.len(), plural_y(categories.len()));
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "categories": categories,
                        "selected": selected.as_str()
                    })
                );
            }
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
        }
    }
}

impl Notifier for Output {
    fn notify(&self, message: &str, severity: Severity) {
        match self.format {
            OutputFormat::Human => match severity {
                Severity::Info => println!("{}", message),
                Severity::Success => println!("✓ {}", message),
                Severity::Warning => eprintln!("⚠ {}", message),
                Severity::Error => eprintln!("✗ {}", message),
            },
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": severity.to_string(), "message": message})
                );
            }
            OutputFormat::Quiet => {
                if severity == Severity::Error {
                    eprintln!("{}", message);
                }
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ça va très bien", 8), "ça va...");
    }

    #[test]
    fn test_only_human_prompts() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural_y(1), "y");
        assert_eq!(plural_y(3), "ies");
    }
}
