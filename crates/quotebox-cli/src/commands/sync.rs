//! Sync command handlers

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::ValueEnum;
use tokio::sync::Mutex;
use tracing::debug;

use quotebox_core::sync::{spawn_sync_poller, PollEvent};
use quotebox_core::{
    Config, Conflict, Decision, HttpFeed, QuoteBook, RemoteFeed, SyncOutcome, SyncService,
};

use crate::editor::{is_interactive, prompt_line};
use crate::output::Output;

/// How conflicts raised by a sync are settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolveMode {
    /// Ask about each conflict (server value when not interactive)
    Review,
    /// Keep the server category for every conflict
    Remote,
    /// Restore the local category for every conflict
    Local,
}

/// Sync once with the remote feed
pub async fn sync(
    book: &Mutex<QuoteBook>,
    config: &Config,
    resolve: ResolveMode,
    output: &mut Output,
) -> Result<()> {
    let service = build_service(config)?;

    output.message(&format!("Fetching quotes from {}...", service.feed().url()));
    run_once(&service, book, resolve, output).await
}

/// Show a quote, then sync and show another on every interval until Ctrl-C
pub async fn watch(
    book: &Mutex<QuoteBook>,
    config: &Config,
    resolve: ResolveMode,
    interval: Option<u64>,
    output: &mut Output,
) -> Result<()> {
    let service = build_service(config)?;
    let interval = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.sync_interval());

    book.lock().await.show_random(None, output);

    let mut poller = spawn_sync_poller(interval);
    loop {
        tokio::select! {
            event = poller.event_rx.recv() => match event {
                Some(PollEvent::Started) => output.message(&format!(
                    "Watching {} every {}s (Ctrl-C to stop)",
                    service.feed().url(),
                    interval.as_secs()
                )),
                Some(PollEvent::Tick) => {
                    if let Err(e) = run_once(&service, book, resolve, output).await {
                        debug!("Periodic sync failed: {}", e);
                    }
                    book.lock().await.show_random(None, output);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                poller.shutdown().await;
                break;
            }
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> Result<SyncService<HttpFeed>> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotes config set sync_enabled true\n  \
             quotes config set sync_url https://example.com/quotes.json"
        );
    }

    let Some(ref sync_url) = config.sync_url else {
        bail!(
            "Sync URL not configured. Set it with:\n  \
             quotes config set sync_url https://example.com/quotes.json"
        );
    };

    let feed = HttpFeed::new(sync_url, config.fetch_timeout())?;
    Ok(SyncService::new(feed, config.fetch_timeout()))
}

async fn run_once<F: RemoteFeed>(
    service: &SyncService<F>,
    book: &Mutex<QuoteBook>,
    resolve: ResolveMode,
    output: &mut Output,
) -> Result<()> {
    let (fetched, report) = match service.perform_sync(book).await {
        Ok(SyncOutcome::Completed { fetched, report }) => (fetched, report),
        Ok(SyncOutcome::Skipped) => {
            output.message("Sync already in progress");
            return Ok(());
        }
        Err(e) => {
            output.warning(&format!("Sync failed: {}", e));
            return Err(e.into());
        }
    };

    if report.changed() {
        output.success(&format!(
            "Sync complete - {} new, {} recategorized",
            report.added, report.updated
        ));
    } else {
        output.success(&format!(
            "Sync complete - already up to date ({} checked)",
            fetched
        ));
    }

    resolve_conflicts(book, resolve, output).await
}

async fn resolve_conflicts(
    book: &Mutex<QuoteBook>,
    resolve: ResolveMode,
    output: &mut Output,
) -> Result<()> {
    let pending = {
        let mut book = book.lock().await;
        let total = book.conflicts().len();
        if total == 0 {
            return Ok(());
        }

        match resolve {
            ResolveMode::Remote => {
                book.resolve_all(Decision::AcceptRemote);
                output.message(&format!("Kept the server category for {} conflict(s)", total));
                return Ok(());
            }
            ResolveMode::Local => {
                book.resolve_all(Decision::KeepLocal);
                output.message(&format!("Restored the local category for {} conflict(s)", total));
                return Ok(());
            }
            ResolveMode::Review if !output.should_prompt() || !is_interactive() => {
                for (i, conflict) in book.conflicts().pending().iter().enumerate() {
                    output.print_conflict(i + 1, total, conflict);
                }
                book.dismiss_conflicts();
                output.warning(&format!(
                    "{} conflict(s) kept the server category; use --resolve local to keep yours",
                    total
                ));
                return Ok(());
            }
            ResolveMode::Review => book.conflicts().pending().to_vec(),
        }
    };

    // The lock is released while waiting on stdin
    let decisions = review(&pending, output, || {
        prompt_line("Keep [s]erver, keep [l]ocal, [S]erver for all, [L]ocal for all? [s]")
    })?;

    let mut book = book.lock().await;
    for (conflict, decision) in &decisions {
        book.resolve_conflict(conflict.id, *decision);
    }

    output.success(&format!("Reviewed {} conflict(s)", pending.len()));
    Ok(())
}

/// Ask for a decision on each conflict, oldest first
///
/// Keeping the local category settles any later conflict on the same quote,
/// so those are not asked about again.
fn review<'a>(
    pending: &'a [Conflict],
    output: &Output,
    mut ask: impl FnMut() -> Result<String>,
) -> Result<Vec<(&'a Conflict, Decision)>> {
    let total = pending.len();
    let mut decisions = Vec::with_capacity(total);
    let mut kept_local: HashSet<&str> = HashSet::new();

    for (i, conflict) in pending.iter().enumerate() {
        if kept_local.contains(conflict.text.as_str()) {
            continue;
        }
        output.print_conflict(i + 1, total, conflict);

        let decision = match ask()?.as_str() {
            "" | "s" => Decision::AcceptRemote,
            "l" => Decision::KeepLocal,
            answer @ ("S" | "L") => {
                let decision = if answer == "L" {
                    Decision::KeepLocal
                } else {
                    Decision::AcceptRemote
                };
                decisions.extend(
                    pending[i..]
                        .iter()
                        .filter(|c| !kept_local.contains(c.text.as_str()))
                        .map(|c| (c, decision)),
                );
                break;
            }
            other => {
                output.warning(&format!("Unrecognized answer '{}', keeping server", other));
                Decision::AcceptRemote
            }
        };

        if decision == Decision::KeepLocal {
            kept_local.insert(conflict.text.as_str());
        }
        decisions.push((conflict, decision));
    }

    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quotebox_core::{MemoryStore, Quote};

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn conflicted_book() -> QuoteBook {
        let mut book =
            QuoteBook::with_storage(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
        book.apply_remote(vec![Quote::new("X", "A"), Quote::new("Y", "A")]);
        book.apply_remote(vec![Quote::new("X", "B"), Quote::new("Y", "C")]);
        book.apply_remote(vec![Quote::new("X", "C")]);
        book
    }

    fn answers(list: &[&str]) -> impl FnMut() -> Result<String> {
        let mut list: Vec<String> = list.iter().rev().map(|s| s.to_string()).collect();
        move || Ok(list.pop().unwrap_or_default())
    }

    #[test]
    fn test_review_skips_conflicts_settled_by_keep_local() {
        let book = conflicted_book();
        let pending = book.conflicts().pending().to_vec();
        assert_eq!(pending.len(), 3);

        let mut asked = 0;
        let mut script = answers(&["l", "s"]);
        let decisions = review(&pending, &quiet(), || {
            asked += 1;
            script()
        })
        .unwrap();

        // The second conflict on X is settled by the first answer
        assert_eq!(asked, 2);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].0.text, "X");
        assert_eq!(decisions[0].1, Decision::KeepLocal);
        assert_eq!(decisions[1].0.text, "Y");
        assert_eq!(decisions[1].1, Decision::AcceptRemote);
    }

    #[test]
    fn test_review_all_answer_covers_the_rest() {
        let book = conflicted_book();
        let pending = book.conflicts().pending().to_vec();

        let decisions = review(&pending, &quiet(), answers(&["s", "L"])).unwrap();

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].1, Decision::AcceptRemote);
        assert!(decisions[1..].iter().all(|(_, d)| *d == Decision::KeepLocal));
    }

    #[tokio::test]
    async fn test_prompts_run_without_the_book_lock() {
        let book = Mutex::new(conflicted_book());
        let pending = book.lock().await.conflicts().pending().to_vec();

        let decisions = review(&pending, &quiet(), || {
            // A concurrent sync must be able to take the lock mid-review
            assert!(book.try_lock().is_ok());
            Ok("l".to_string())
        })
        .unwrap();

        let mut guard = book.lock().await;
        for (conflict, decision) in &decisions {
            guard.resolve_conflict(conflict.id, *decision);
        }
        assert!(guard.conflicts().is_empty());
        for text in ["X", "Y"] {
            let quote = guard.store().quotes().iter().find(|q| q.text == text).unwrap();
            assert_eq!(quote.category, "A");
        }
    }
}
