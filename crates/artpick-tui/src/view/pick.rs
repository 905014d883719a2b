use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::view::centered_rect;

/// Render the "pick N total" input as a centered popup.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup = centered_rect(44, 7, f.area());
    let page = app.session.page_number();

    let lines = vec![
        Line::from(Span::styled(
            format!("  Total to pick, starting at page {page}:"),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(theme.active)),
            Span::styled(
                if app.quick_pick.buffer.is_empty() {
                    "0".to_string()
                } else {
                    app.quick_pick.buffer.clone()
                },
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Enter",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": apply (0 clears)   ", Style::default().fg(theme.dim)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": cancel", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Pick Records "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
