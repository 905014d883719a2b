mod backend;
mod update;

use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use artpick_core::{Record, SelectionSession};

use crate::model::pick::QuickPickState;
use crate::model::table::{SortColumn, sorted_indices};
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    QuickPick,
}

/// Main application state.
pub struct App {
    pub session: SelectionSession,
    pub theme: Theme,
    /// Where records come from, shown in the header.
    pub source_label: String,
    pub input_mode: InputMode,
    /// Cursor row in display order.
    pub cursor: usize,
    pub sort: SortColumn,
    pub sort_reversed: bool,
    /// Display order of the loaded page, as indices into `session.records()`.
    pub display_order: Vec<usize>,
    pub page_size_options: Vec<usize>,
    pub quick_pick: QuickPickState,
    pub selection_panel_visible: bool,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_quit: bool,
    pub tick: usize,
    pub visible_rows: usize,
    /// Sender for backend commands; `None` in tests.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(session: SelectionSession, theme: Theme, page_size_options: Vec<usize>) -> Self {
        Self {
            session,
            theme,
            source_label: String::new(),
            input_mode: InputMode::Normal,
            cursor: 0,
            sort: SortColumn::FetchOrder,
            sort_reversed: false,
            display_order: Vec::new(),
            page_size_options,
            quick_pick: QuickPickState::default(),
            selection_panel_visible: false,
            show_help: false,
            confirm_quit: false,
            should_quit: false,
            tick: 0,
            visible_rows: 20,
            backend_cmd_tx: None,
        }
    }

    /// Recompute `display_order` from the loaded page and current sort,
    /// keeping the cursor on the same record when it is still present.
    pub fn recompute_display_order(&mut self) {
        let prev_id = self.record_at_cursor().map(|r| r.id);
        let records = self.session.records();
        self.display_order = sorted_indices(records, self.sort, self.sort_reversed);

        let restored = prev_id.and_then(|id| {
            self.display_order
                .iter()
                .position(|&i| records[i].id == id)
        });
        self.cursor = match restored {
            Some(pos) => pos,
            None => self.cursor.min(self.display_order.len().saturating_sub(1)),
        };
    }

    /// Records of the loaded page in display order.
    pub fn display_records(&self) -> impl Iterator<Item = &Record> {
        let records = self.session.records();
        self.display_order.iter().filter_map(move |&i| records.get(i))
    }

    pub fn record_at_cursor(&self) -> Option<&Record> {
        self.display_order
            .get(self.cursor)
            .and_then(|&i| self.session.records().get(i))
    }

    /// 1-based index range of the loaded window, e.g. `(13, 24)`.
    pub fn record_range(&self) -> (usize, usize) {
        let window = self.session.window();
        let first = (self.session.page_number() - 1) * window.page_size;
        if self.session.records().is_empty() {
            return (0, 0);
        }
        (first + 1, first + self.session.records().len())
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        let main_area = if self.selection_panel_visible {
            let panel_width = if area.width > 120 {
                45
            } else {
                (area.width / 3).max(30)
            };
            let chunks =
                Layout::horizontal([Constraint::Min(40), Constraint::Length(panel_width)])
                    .split(area);
            crate::view::selection::render(f, chunks[1], self);
            chunks[0]
        } else {
            area
        };

        crate::view::table::render_in(f, self, main_area);

        if self.quick_pick.active {
            crate::view::pick::render(f, self);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }

    /// Height available for table rows in a terminal of `height` rows.
    fn table_rows_for(height: u16) -> usize {
        // header, status, paginator, footer, table borders and column header
        (height as usize).saturating_sub(7)
    }
}

#[cfg(test)]
mod tests;
