//! Import and export command handlers

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quotebox_core::QuoteBook;

use crate::output::{Output, OutputFormat};

/// Import quotes from a JSON file, skipping pairs already present
pub fn import(book: &mut QuoteBook, file: PathBuf, output: &Output) -> Result<()> {
    let payload = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read import file: {:?}", file))?;

    let report = book
        .import_json(&payload)
        .with_context(|| format!("Failed to import {:?}", file))?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "added": report.added,
                    "skipped": report.skipped,
                    "rejected": report.rejected
                })
            );
        }
        _ if report.added == 0 => output.message("Nothing new to import"),
        _ => output.success(&format!("Imported {} quote(s)", report.added)),
    }

    if report.skipped > 0 || report.rejected > 0 {
        output.message(&format!(
            "  {} already present, {} invalid",
            report.skipped, report.rejected
        ));
    }

    Ok(())
}

/// Export the full collection as JSON to a file or stdout
pub fn export(book: &QuoteBook, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let json = book.export_json()?;

    let Some(file) = file else {
        println!("{}", json);
        return Ok(());
    };

    fs::write(&file, json).with_context(|| format!("Failed to write export file: {:?}", file))?;
    output.success(&format!(
        "Exported {} quote(s) to {}",
        book.store().len(),
        file.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebox_core::{KeyValueStore, MemoryStore, Quote};
    use tempfile::TempDir;

    fn book_with(quotes: &str) -> QuoteBook {
        let mut durable = MemoryStore::new();
        durable.set("quotes", quotes).unwrap();
        QuoteBook::with_storage(Box::new(durable), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_export_then_import_into_other_book() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("quotes.json");
        let output = Output::new(OutputFormat::Quiet);

        let source = book_with(r#"[{"text": "A", "category": "x"}, {"text": "B"}]"#);
        export(&source, Some(path.clone()), &output).unwrap();

        let mut target = book_with(r#"[{"text": "A", "category": "x"}]"#);
        import(&mut target, path.clone(), &output).unwrap();
        import(&mut target, path, &output).unwrap();

        assert_eq!(
            target.store().quotes(),
            &[Quote::new("A", "x"), Quote::new("B", "uncategorized")]
        );
    }

    #[test]
    fn test_import_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut book = book_with("[]");
        let output = Output::new(OutputFormat::Quiet);

        let err = import(&mut book, temp.path().join("missing.json"), &output).unwrap_err();
        assert!(err.to_string().contains("Failed to read import file"));
    }

    #[test]
    fn test_import_rejects_non_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, r#"{"text": "not a list"}"#).unwrap();

        let mut book = book_with("[]");
        let output = Output::new(OutputFormat::Quiet);

        assert!(import(&mut book, path, &output).is_err());
        assert!(book.store().is_empty());
    }
}
