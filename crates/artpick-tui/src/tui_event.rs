use artpick_core::{FetchTicket, Page};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone)]
pub enum BackendCommand {
    /// Fetch one page. The reply carries the ticket back unchanged.
    FetchPage(FetchTicket),
}

/// Events flowing from the backend fetch tasks to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    PageFetched { ticket: FetchTicket, page: Page },
    /// The fetch failed; the error has already been logged.
    PageFailed { ticket: FetchTicket, error: String },
}
