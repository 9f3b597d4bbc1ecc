use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme::ACCENT));
    let text = |t: &'static str| Span::styled(t, theme::dim_style());

    let lines = vec![
        Line::from(vec![
            text("Pick an employee to see their full history, or "),
            key("All Employees"),
            text(" to page through everyone."),
        ]),
        Line::from(vec![
            key("f"),
            text(" filter  "),
            key("m"),
            text(" view more  "),
            key("space"),
            text(" approve  "),
            key("j/k"),
            text(" move  "),
            key("?"),
            text(" help  "),
            key("Ctrl-q"),
            text(" quit"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Instructions ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
