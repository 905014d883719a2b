use std::sync::Arc;

use artpick_core::{FetchTicket, PageSource};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands from the TUI until the channel closes or `cancel` fires.
///
/// Each fetch runs as its own task so a slow page never blocks a newer
/// request. Responses to superseded requests are still delivered; the session
/// discards them by generation.
pub async fn run(
    source: Arc<dyn PageSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => cmd,
        };
        let Some(cmd) = cmd else { break };

        match cmd {
            BackendCommand::FetchPage(ticket) => {
                let source = Arc::clone(&source);
                let tx = event_tx.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        event = fetch(source.as_ref(), ticket) => {
                            // Receiver gone means the UI is shutting down.
                            let _ = tx.send(event);
                        }
                    }
                });
            }
        }
    }
}

/// Run one fetch and turn the outcome into a backend event. Failures are
/// logged here and reported as an empty page by the session.
pub async fn fetch(source: &dyn PageSource, ticket: FetchTicket) -> BackendEvent {
    match source.fetch_page(ticket.request).await {
        Ok(page) => {
            tracing::debug!(
                source = source.name(),
                page = ticket.request.page,
                records = page.records.len(),
                "page fetched"
            );
            BackendEvent::PageFetched { ticket, page }
        }
        Err(e) => {
            tracing::warn!(
                source = source.name(),
                page = ticket.request.page,
                limit = ticket.request.limit,
                error = %e,
                "error fetching page"
            );
            BackendEvent::PageFailed {
                ticket,
                error: e.to_string(),
            }
        }
    }
}
