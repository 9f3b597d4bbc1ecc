use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::Transaction;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

/// Everything the list needs; it keeps nothing between frames.
pub(crate) struct TransactionList<'a> {
    pub(crate) transactions: Option<&'a [Transaction]>,
    pub(crate) cursor: usize,
    pub(crate) scroll: usize,
    pub(crate) heading: String,
}

fn block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ))
}

pub(crate) fn render(f: &mut Frame, area: Rect, list: &TransactionList) {
    let Some(transactions) = list.transactions else {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("Loading...", theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg)
                .centered()
                .block(block(format!(" {} ", list.heading))),
            area,
        );
        return;
    };

    if transactions.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions", theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg)
                .centered()
                .block(block(format!(" {} (0) ", list.heading))),
            area,
        );
        return;
    }

    let header_cells = ["Date", "Employee", "Merchant", "Amount", "Approved"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .skip(list.scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == list.cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let (check, check_style) = if txn.approved {
                ("[x]", theme::approved_style())
            } else {
                ("[ ]", theme::dim_style())
            };

            Row::new(vec![
                Cell::from(format!("  {}", txn.date.format("%b %d, %Y"))),
                Cell::from(truncate(&txn.employee.full_name(), 24)),
                Cell::from(truncate(&txn.merchant, 32)),
                Cell::from(Span::styled(format_amount(txn.amount), theme::amount_style())),
                Cell::from(Span::styled(check, check_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(24),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths).header(header).block(block(format!(
        " {} ({}) ",
        list.heading,
        transactions.len()
    )));

    f.render_widget(table, area);
}
