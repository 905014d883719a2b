use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use artpick_core::{Record, SessionPhase};

use crate::app::App;
use crate::model::table::SortColumn;
use crate::theme::Theme;
use crate::view::{spinner_char, truncate};

/// Render the catalog table screen into the given area.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // status line
        Constraint::Min(5),    // table
        Constraint::Length(1), // paginator
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app, &app.theme);
    render_status(f, chunks[1], app, &app.theme);
    if app.session.is_loading() {
        render_loading(f, chunks[2], app);
    } else {
        render_table(f, chunks[2], app);
    }
    render_paginator(f, chunks[3], app, &app.theme);
    render_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let spans = vec![
        Span::styled(" artpick ", theme.header_style()),
        Span::styled(
            " Catalog",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.source_label),
            Style::default().fg(theme.dim),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `Selected: N (M pending)` plus the active plan, if any.
fn render_status(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let session = &app.session;
    let mut spans = vec![Span::styled(
        format!(" Selected: {}", session.selection().len()),
        Style::default()
            .fg(theme.selected)
            .add_modifier(Modifier::BOLD),
    )];

    let pending = session.pending();
    if pending > 0 {
        spans.push(Span::styled(
            format!(" ({pending} pending)"),
            Style::default().fg(theme.pending),
        ));
    }

    if session.phase() == SessionPhase::Planning {
        let plan = session.plan();
        let pages = match (plan.iter().next(), plan.last_page()) {
            (Some((first, _)), Some(last)) if first != last => format!("pages {first}\u{2013}{last}"),
            (Some((first, _)), _) => format!("page {first}"),
            _ => String::new(),
        };
        spans.push(Span::styled(
            format!("  auto-pick {} across {}", session.requested_total(), pages),
            Style::default().fg(theme.planned),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_loading(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = Line::from(Span::styled(
        format!("{} Loading...", spinner_char(app.tick)),
        Style::default().fg(theme.spinner),
    ))
    .centered();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);
    let middle = Rect {
        y: inner.y + inner.height / 2,
        height: 1.min(inner.height),
        ..inner
    };
    f.render_widget(Paragraph::new(text), middle);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let session = &app.session;
    let wide = area.width >= 100;

    let records = session.records();
    let all_checked = !records.is_empty() && records.iter().all(|r| session.is_selected(r.id));
    let header_box = if all_checked { "[x]" } else { "[ ]" };

    let mut header_cells = vec![header_box, "Title", "Origin", "Artist"];
    if wide {
        header_cells.push("Inscriptions");
    }
    header_cells.extend(["Start Year", "End Year"]);
    let header = Row::new(header_cells.into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let planned = session.plan().count_for(session.page_number());
    let title_width = if wide {
        (area.width as usize).saturating_sub(90).max(20)
    } else {
        (area.width as usize).saturating_sub(60).max(12)
    };

    let rows: Vec<Row> = app
        .display_records()
        .map(|record| {
            let checked = session.is_selected(record.id);
            let fetch_pos = records.iter().position(|r| r.id == record.id);
            let in_plan = fetch_pos.is_some_and(|p| p < planned);
            let mark = if checked { "[x]" } else { "[ ]" };
            let mark_style = if !checked && in_plan {
                Style::default().fg(theme.planned)
            } else {
                theme.checkbox_style(checked)
            };
            record_row(record, mark, mark_style, wide, title_width)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(if wide { 28 } else { 20 }),
    ];
    if wide {
        widths.push(Constraint::Length(20));
    }
    widths.extend([Constraint::Length(10), Constraint::Length(9)]);

    let sort_title = if app.sort == SortColumn::FetchOrder {
        format!(" Sort: {} (s) ", app.sort.label())
    } else if app.sort_reversed {
        format!(" Sort: {} \u{2191} (s) ", app.sort.label())
    } else {
        format!(" Sort: {} \u{2193} (s) ", app.sort.label())
    };

    let empty = rows.is_empty();
    let table = Table::new(rows, &widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(sort_title),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !empty {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn record_row<'a>(
    record: &'a Record,
    mark: &'a str,
    mark_style: Style,
    wide: bool,
    title_width: usize,
) -> Row<'a> {
    let mut cells = vec![
        Cell::from(mark).style(mark_style),
        Cell::from(truncate(record.title_label(), title_width)),
        Cell::from(truncate(record.origin_label(), 14)),
        Cell::from(truncate(record.artist_label(), if wide { 28 } else { 20 })),
    ];
    if wide {
        cells.push(Cell::from(truncate(record.inscriptions_label(), 20)));
    }
    cells.push(Cell::from(Record::year_label(record.date_start)));
    cells.push(Cell::from(Record::year_label(record.date_end)));
    Row::new(cells)
}

fn render_paginator(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let session = &app.session;
    let page = session.page_number();
    let pages = session.total_pages();
    let (first, last) = app.record_range();

    let nav = |enabled: bool, s: &'static str| {
        if enabled {
            Span::styled(s, Style::default().fg(theme.active))
        } else {
            Span::styled(s, Style::default().fg(theme.dim))
        }
    };

    let spans = vec![
        Span::raw(" "),
        nav(page > 1, "\u{00AB} "),
        nav(page > 1, "\u{2039} "),
        Span::styled(
            format!("Page {page}/{pages}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        nav(page < pages, " \u{203A}"),
        nav(page < pages, " \u{00BB}"),
        Span::styled(
            format!("   rows: {}", session.page_size()),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("   {first}\u{2013}{last} of {}", session.total_records()),
            Style::default().fg(theme.dim),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let hints = if app.session.is_loading() {
        " h/l:page  z:rows  p:pick N  Tab:selected  ?:help  q:quit"
    } else {
        " Space:check  a:all  p:pick N  h/l:page  z:rows  s/S:sort  Tab:selected  ?:help  q:quit"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, theme.footer_style()))),
        area,
    );
}
