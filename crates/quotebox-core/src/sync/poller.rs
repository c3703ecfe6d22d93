//! Periodic sync trigger
//!
//! A background task that signals the front end to sync on a fixed
//! interval. The task never touches the book itself; the receiver calls
//! [`SyncService::perform_sync`](super::SyncService::perform_sync), whose
//! single-flight guard absorbs ticks that arrive while a sync is running.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Commands sent to the poller task
#[derive(Debug)]
pub enum PollCommand {
    /// Stop the poller
    Shutdown,
}

/// Events emitted by the poller task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// Polling has started
    Started,
    /// Time to sync
    Tick,
}

/// Handle for controlling the background poller
pub struct PollerHandle {
    pub command_tx: mpsc::Sender<PollCommand>,
    pub event_rx: mpsc::Receiver<PollEvent>,
}

impl PollerHandle {
    /// Ask the poller to stop; it also stops when this handle is dropped
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(PollCommand::Shutdown).await;
    }
}

/// Spawn a background task that emits [`PollEvent::Tick`] every `interval`
pub fn spawn_sync_poller(interval: Duration) -> PollerHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    tokio::spawn(sync_poller_task(interval, command_rx, event_tx));

    PollerHandle {
        command_tx,
        event_rx,
    }
}

async fn sync_poller_task(
    interval: Duration,
    mut command_rx: mpsc::Receiver<PollCommand>,
    event_tx: mpsc::Sender<PollEvent>,
) {
    debug!("Sync poller started, interval={:?}", interval);
    if event_tx.send(PollEvent::Started).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                if event_tx.send(PollEvent::Tick).await.is_err() {
                    break;
                }
            }
            cmd = command_rx.recv() => {
                if matches!(cmd, Some(PollCommand::Shutdown) | None) {
                    break;
                }
            }
        }
    }

    debug!("Sync poller stopped");
}
