use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, InputMode, ViewMode};
use super::commands;
use super::theme;
use super::widgets::{instructions, select, transactions};

/// Rows taken by everything except the table body.
pub(crate) const CHROME_ROWS: u16 = 1 + 4 + 3 + 1 + 1 + 1 + 3;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(4), // Instructions
            Constraint::Length(3), // Employee select
            Constraint::Min(5),    // Transaction list
            Constraint::Length(1), // View more
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    instructions::render(f, chunks[1]);
    select::render(f, chunks[2], &app.employee_select);
    render_transactions(f, chunks[3], app);
    render_view_more(f, chunks[4], app);
    render_status_bar(f, chunks[5], app);
    render_command_bar(f, chunks[6], app);

    select::render_popup(f, chunks[2], f.area(), &app.employee_select);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " EmpTUI ",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(err) = &app.last_error {
        spans.push(Span::styled(format!(" {err} "), theme::error_style()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::HEADER_BG)),
        area,
    );
}

fn heading(app: &App) -> String {
    match &app.mode {
        ViewMode::All => "All transactions".to_string(),
        ViewMode::Employee(id) => app
            .by_employee
            .data()
            .and_then(|list| list.first())
            .map(|t| t.employee.clone())
            .or_else(|| {
                app.employees
                    .data()
                    .and_then(|list| list.iter().find(|e| &e.id == id).cloned())
            })
            .map_or_else(|| id.clone(), |e| e.full_name()),
    }
}

fn render_transactions(f: &mut Frame, area: Rect, app: &App) {
    let list = transactions::TransactionList {
        transactions: app.transactions.as_deref(),
        cursor: app.cursor.index,
        scroll: app.cursor.scroll,
        heading: heading(app),
    };
    transactions::render(f, area, &list);
}

fn render_view_more(f: &mut Frame, area: Rect, app: &App) {
    let line = if app.is_loading {
        let what = if app.employees.loading() {
            " Loading employees..."
        } else if app.by_employee.loading() {
            " Loading employee transactions..."
        } else if app.paginated.loading() {
            " Loading transactions..."
        } else {
            " Loading..."
        };
        Line::from(Span::styled(
            what,
            theme::dim_style().add_modifier(Modifier::ITALIC),
        ))
    } else if app.can_view_more() {
        let hint = if app.mode == ViewMode::All && app.paginated.is_exhausted() {
            "  all pages loaded"
        } else {
            "  press m"
        };
        Line::from(vec![
            Span::raw(" "),
            Span::styled("[ View More ]", theme::button_style()),
            Span::styled(hint, theme::dim_style()),
        ])
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::Select => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    };

    let mut info = format!(" {} | {} txns", heading(app), app.transaction_count());
    if let Some(next) = app.paginated.data().and_then(|page| page.next_page) {
        info.push_str(&format!(" | next page {next}"));
    }

    let right = match app.input_mode {
        InputMode::Select => " Enter pick | Esc cancel ",
        _ => " f filter | m more | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.len() as u16),
        ),
        InputMode::Select => (
            Line::from(Span::styled(
                " Type to filter employees",
                theme::dim_style(),
            )),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, f to filter, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " EmpTUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           g/G        Top/Bottom",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  f or Enter       Open employee filter  Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Actions"),
        Line::from(Span::styled(
            "  m               View more              space      Toggle approval",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  r               Reload                 :          Command mode",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 1 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
