use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::theme;
use crate::ui::util::truncate;

/// What the select shows for one item, and the key it matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectItem {
    pub(crate) value: String,
    pub(crate) label: String,
}

/// A dropdown with type-to-filter over any item type.
///
/// The widget only tracks its own cursor (open state, filter text and
/// highlight). Items, the loading flag and what happens on change all come
/// from the owner.
pub(crate) struct InputSelect<T> {
    label: &'static str,
    loading_label: &'static str,
    default_value: T,
    parse_item: fn(&T) -> SelectItem,
    items: Vec<T>,
    selected: T,
    is_loading: bool,
    is_open: bool,
    filter: String,
    highlighted: usize,
}

impl<T: Clone> InputSelect<T> {
    pub(crate) fn new(
        label: &'static str,
        loading_label: &'static str,
        default_value: T,
        parse_item: fn(&T) -> SelectItem,
    ) -> Self {
        Self {
            label,
            loading_label,
            selected: default_value.clone(),
            default_value,
            parse_item,
            items: Vec::new(),
            is_loading: false,
            is_open: false,
            filter: String::new(),
            highlighted: 0,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub(crate) fn is_open(&self) -> bool {
        self.is_open
    }

    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }

    pub(crate) fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn selected(&self) -> &T {
        &self.selected
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
        if loading {
            self.close();
        }
    }

    pub(crate) fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.highlighted = 0;
    }

    /// Set the shown value without firing a change.
    pub(crate) fn select(&mut self, item: T) {
        self.selected = item;
    }

    pub(crate) fn reset(&mut self) {
        self.selected = self.default_value.clone();
        self.close();
    }

    /// Text for the collapsed box.
    pub(crate) fn display_text(&self) -> String {
        if self.is_loading {
            format!("{}...", self.loading_label)
        } else {
            (self.parse_item)(&self.selected).label
        }
    }

    /// Returns false when there is nothing to pick from yet.
    pub(crate) fn open(&mut self) -> bool {
        if self.is_loading || self.items.is_empty() {
            return false;
        }
        self.is_open = true;
        self.filter.clear();
        let selected_value = (self.parse_item)(&self.selected).value;
        self.highlighted = self
            .visible()
            .iter()
            .position(|(_, item)| item.value == selected_value)
            .unwrap_or(0);
        true
    }

    pub(crate) fn close(&mut self) {
        self.is_open = false;
        self.filter.clear();
        self.highlighted = 0;
    }

    /// Items matching the filter (case-insensitive, on the label), with their index.
    pub(crate) fn visible(&self) -> Vec<(usize, SelectItem)> {
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .map(self.parse_item)
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub(crate) fn highlight_next(&mut self) {
        let len = self.visible().len();
        if self.highlighted + 1 < len {
            self.highlighted += 1;
        }
    }

    pub(crate) fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub(crate) fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.highlighted = 0;
    }

    pub(crate) fn pop_filter(&mut self) {
        self.filter.pop();
        self.highlighted = 0;
    }

    /// Commit the highlighted item. `None` means nothing matched, which callers ignore.
    pub(crate) fn confirm(&mut self) -> Option<T> {
        let picked = self
            .visible()
            .get(self.highlighted)
            .and_then(|(idx, _)| self.items.get(*idx).cloned());
        self.close();
        if let Some(ref item) = picked {
            self.selected = item.clone();
        }
        picked
    }
}

/// The collapsed select: label plus current value (or the loading label).
pub(crate) fn render<T: Clone>(f: &mut Frame, area: Rect, select: &InputSelect<T>) {
    let value_style = if select.is_loading() {
        theme::dim_style().add_modifier(Modifier::ITALIC)
    } else {
        theme::normal_style()
    };
    let border = if select.is_open() {
        theme::ACCENT
    } else {
        theme::OVERLAY
    };

    let content = Line::from(vec![
        Span::styled(format!(" {} ", select.display_text()), value_style),
        Span::styled(if select.is_open() { "▴" } else { "▾" }, theme::dim_style()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {} ", select.label()),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(content).block(block), area);
}

/// The open list, drawn just below `anchor`.
pub(crate) fn render_popup<T: Clone>(f: &mut Frame, anchor: Rect, bounds: Rect, select: &InputSelect<T>) {
    if !select.is_open() {
        return;
    }

    let visible = select.visible();
    let max_rows = bounds
        .bottom()
        .saturating_sub(anchor.bottom())
        .saturating_sub(3) as usize;
    let rows = visible.len().clamp(1, max_rows.max(1));
    let height = rows as u16 + 3;
    let width = anchor.width.min(48);
    let area = Rect::new(
        anchor.x,
        anchor.bottom(),
        width,
        height.min(bounds.bottom().saturating_sub(anchor.bottom())),
    );

    let skip = select.highlighted().saturating_sub(rows.saturating_sub(1));
    let mut lines: Vec<ListItem> = vec![ListItem::new(Line::from(vec![
        Span::styled(" / ", Style::default().fg(theme::YELLOW)),
        Span::styled(select.filter().to_string(), theme::command_bar_style()),
    ]))];
    if visible.is_empty() {
        lines.push(ListItem::new(Span::styled(" No matches", theme::dim_style())));
    }
    for (pos, (_, item)) in visible.iter().enumerate().skip(skip).take(rows) {
        let style = if pos == select.highlighted() {
            theme::selected_style()
        } else {
            theme::normal_style()
        };
        lines.push(ListItem::new(Span::styled(
            format!(" {}", truncate(&item.label, width.saturating_sub(3) as usize)),
            style,
        )));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        List::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        area,
    );
}
