use artpick_core::SessionEvent;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let event = match event {
            BackendEvent::PageFetched { ticket, page } => SessionEvent::PageLoaded {
                generation: ticket.generation,
                page,
            },
            BackendEvent::PageFailed { ticket, error } => SessionEvent::PageFailed {
                generation: ticket.generation,
                error,
            },
        };
        self.session.update(event);
        self.recompute_display_order();
    }
}
