use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::app::App;
use crate::view::truncate;

/// Side panel listing every selected record, including those on pages that
/// are not loaded.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let selection = app.session.selection();
    let width = (area.width as usize).saturating_sub(4);

    let items: Vec<ListItem> = selection
        .iter()
        .map(|record| {
            let on_page = app.session.records().iter().any(|r| r.id == record.id);
            let style = if on_page {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.dim)
            };
            let label = match record.title.as_deref() {
                Some(title) => format!("{} {}", record.id, title),
                None => record.id.to_string(),
            };
            ListItem::new(Line::from(Span::styled(truncate(&label, width), style)))
        })
        .collect();

    let title = format!(" Selected ({}) ", selection.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme.selected)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}
