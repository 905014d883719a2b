use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(64, 32, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Rows", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        key_line("g / Home", "Go to top", theme),
        key_line("G / End", "Go to bottom", theme),
        key_line("Ctrl+d / Ctrl+u", "Scroll down / up one screen", theme),
        Line::from(""),
        section_header("Pages", theme),
        key_line("l / \u{2192} / PgDn", "Next page", theme),
        key_line("h / \u{2190} / PgUp", "Previous page", theme),
        key_line("[ / ]", "First / last page", theme),
        key_line("z", "Cycle rows per page", theme),
        key_line("Ctrl+r", "Reload current page", theme),
        Line::from(""),
        section_header("Selection", theme),
        key_line("Space", "Check / uncheck row", theme),
        key_line("a", "Check / uncheck all rows on page", theme),
        key_line("p / n", "Pick N total from this page on", theme),
        key_line("Tab", "Toggle selected-records panel", theme),
        Line::from(""),
        section_header("Display", theme),
        key_line("s / S", "Cycle sort column / reverse", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<20}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
