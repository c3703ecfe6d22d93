//! Status command handler

use std::path::PathBuf;

use anyhow::Result;

use quotebox_core::storage::{FileStore, QUOTES_KEY};
use quotebox_core::{Config, QuoteBook};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(
    book: &QuoteBook,
    config: &Config,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let record = FileStore::new(&config.data_dir).path_for(QUOTES_KEY);
    let record_size = std::fs::metadata(&record).map(|m| m.len()).ok();
    let quotes = book.store().len();
    let categories = book.categories();
    let selected = book.selected_category();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "quotes": quotes,
                    "categories": categories.len(),
                    "selected_category": selected.as_str(),
                    "sync_enabled": config.sync_enabled,
                    "sync_url": config.sync_url,
                    "storage": {
                        "data_dir": config.data_dir,
                        "record_exists": record_size.is_some(),
                        "record_size": record_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", quotes);
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Quotebox Status");
            println!("===============");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", quotes);
            println!("  Categories: {}", categories.len());
            println!("  Filter:     {}", selected);
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.sync_url {
                println!("  Feed:     {}", url);
            }
            println!("  Interval: {}s", config.sync_interval().as_secs());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            match record_size {
                Some(size) => println!("  Record:   {} bytes", size),
                None => println!("  Record:   (not saved yet, using built-in quotes)"),
            }
            println!("  Config:   {}", effective_path.display());
        }
    }

    Ok(())
}
