use artpick_core::{FetchTicket, SessionEvent, parse_pick_count};

use super::{App, InputMode};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if let Action::Tick = action {
            self.tick = self.tick.wrapping_add(1);
            return false;
        }
        if let Action::Resize(_w, h) = action {
            self.visible_rows = Self::table_rows_for(h);
            return false;
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => self.confirm_quit = false,
                _ => {}
            }
            return false;
        }

        // Quick-pick overlay captures all input while open
        if self.quick_pick.active {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::TextInput(c) => self.quick_pick.push(c),
                Action::TextBackspace => self.quick_pick.backspace(),
                Action::TextConfirm => {
                    let count = parse_pick_count(&self.quick_pick.buffer);
                    self.close_quick_pick();
                    self.session.update(SessionEvent::QuickPick(count));
                }
                Action::TextCancel => self.close_quick_pick(),
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Quit => self.confirm_quit = true,
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => self.confirm_quit = true,
            Action::MoveDown => {
                if self.cursor + 1 < self.display_order.len() {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => self.cursor = self.cursor.saturating_sub(1),
            Action::GoTop => self.cursor = 0,
            Action::GoBottom => self.cursor = self.display_order.len().saturating_sub(1),
            Action::ScrollDown => {
                let page = self.visible_rows.max(1);
                let last = self.display_order.len().saturating_sub(1);
                self.cursor = (self.cursor + page).min(last);
            }
            Action::ScrollUp => {
                let page = self.visible_rows.max(1);
                self.cursor = self.cursor.saturating_sub(page);
            }

            Action::NextPage => {
                let page = self.session.page_number();
                if page < self.session.total_pages() {
                    self.goto_page(page + 1);
                }
            }
            Action::PrevPage => {
                let page = self.session.page_number();
                if page > 1 {
                    self.goto_page(page - 1);
                }
            }
            Action::FirstPage => {
                if self.session.page_number() != 1 {
                    self.goto_page(1);
                }
            }
            Action::LastPage => {
                let last = self.session.total_pages();
                if self.session.page_number() != last {
                    self.goto_page(last);
                }
            }
            Action::CyclePageSize => self.cycle_page_size(),
            Action::Reload => {
                let ticket = self.session.reload();
                self.request_fetch(ticket);
            }

            // Rows can't be edited while the table shows a loading placeholder.
            Action::ToggleRow if !self.session.is_loading() => {
                if let Some(id) = self.record_at_cursor().map(|r| r.id) {
                    self.session.update(SessionEvent::ToggleRecord(id));
                }
            }
            Action::ToggleAllVisible if !self.session.is_loading() => {
                let records = self.session.records();
                let all_checked =
                    !records.is_empty() && records.iter().all(|r| self.session.is_selected(r.id));
                self.session
                    .update(SessionEvent::SetAllVisible(!all_checked));
            }
            Action::OpenQuickPick => {
                self.quick_pick.open(self.session.requested_total());
                self.input_mode = InputMode::QuickPick;
            }

            Action::CycleSort => {
                self.sort = self.sort.next();
                self.recompute_display_order();
            }
            Action::ReverseSort => {
                self.sort_reversed = !self.sort_reversed;
                self.recompute_display_order();
            }
            Action::ToggleSelectionPanel => {
                self.selection_panel_visible = !self.selection_panel_visible;
            }
            Action::ToggleHelp => self.show_help = true,
            _ => {}
        }
        false
    }

    /// Request the first page. Called once the backend channel is wired.
    pub fn start(&mut self) {
        let window = self.session.window();
        let ticket = self.session.change_page(window.offset, window.page_size);
        self.request_fetch(ticket);
    }

    /// Navigate to a 1-based page at the current page size.
    pub fn goto_page(&mut self, page: usize) {
        let size = self.session.page_size();
        let ticket = self.session.change_page((page.max(1) - 1) * size, size);
        self.request_fetch(ticket);
    }

    /// Switch to the next offered page size, keeping the first visible record
    /// inside the new window.
    fn cycle_page_size(&mut self) {
        if self.page_size_options.is_empty() {
            return;
        }
        let current = self.session.page_size();
        let next = self
            .page_size_options
            .iter()
            .copied()
            .find(|&s| s > current)
            .unwrap_or(self.page_size_options[0]);
        if next == current {
            return;
        }
        let offset = self.session.window().offset;
        let aligned = offset / next * next;
        let ticket = self.session.change_page(aligned, next);
        self.request_fetch(ticket);
    }

    fn close_quick_pick(&mut self) {
        self.quick_pick.close();
        self.input_mode = InputMode::Normal;
    }

    fn request_fetch(&mut self, ticket: FetchTicket) {
        self.cursor = 0;
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(BackendCommand::FetchPage(ticket)).is_err()
        {
            tracing::error!(
                page = ticket.request.page,
                "backend channel closed, page request dropped"
            );
        }
    }
}
