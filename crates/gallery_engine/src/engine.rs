use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gallery_core::{FetchTicket, HitId, Query};
use gallery_logging::gallery_debug;

use crate::{Deleter, EngineError, EngineEvent, Fetcher};

enum EngineCommand {
    FetchPage { ticket: FetchTicket, query: Query },
    Delete { id: HitId },
}

/// Runs fetches and deletes on a background tokio runtime and reports the
/// outcomes as [`EngineEvent`]s. Dropping the handle stops the worker.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn Fetcher>, deleter: Arc<dyn Deleter>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let deleter = deleter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(fetcher.as_ref(), deleter.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
            gallery_debug!("Engine command channel closed; worker exiting");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_page(&self, ticket: FetchTicket, query: Query) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage { ticket, query });
    }

    pub fn delete(&self, id: HitId) {
        let _ = self.cmd_tx.send(EngineCommand::Delete { id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    deleter: &dyn Deleter,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::FetchPage { ticket, query } => {
            let result = fetcher.fetch(&query, ticket.cursor.as_ref()).await;
            EngineEvent::PageFetched { ticket, result }
        }
        EngineCommand::Delete { id } => {
            let result = deleter.delete_by_id(&id).await;
            EngineEvent::DeleteCompleted { id, result }
        }
    }
}
