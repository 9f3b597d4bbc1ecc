use ratatui::style::{Color, Modifier, Style};

pub(crate) const HEADER_BG: Color = Color::Rgb(22, 24, 29);
pub(crate) const HEADER_FG: Color = Color::Rgb(230, 232, 236);
pub(crate) const ACCENT: Color = Color::Rgb(228, 242, 96);
pub(crate) const GREEN: Color = Color::Rgb(134, 214, 151);
pub(crate) const RED: Color = Color::Rgb(240, 128, 128);
pub(crate) const YELLOW: Color = Color::Rgb(246, 211, 122);
pub(crate) const SURFACE: Color = Color::Rgb(38, 41, 48);
pub(crate) const TEXT: Color = Color::Rgb(222, 224, 229);
pub(crate) const TEXT_DIM: Color = Color::Rgb(128, 134, 146);
pub(crate) const OVERLAY: Color = Color::Rgb(70, 75, 86);
pub(crate) const COMMAND_BG: Color = Color::Rgb(16, 17, 21);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn amount_style() -> Style {
    Style::default().fg(YELLOW)
}

pub(crate) fn approved_style() -> Style {
    Style::default().fg(GREEN).add_modifier(Modifier::BOLD)
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(RED)
}

pub(crate) fn button_style() -> Style {
    Style::default()
        .fg(HEADER_BG)
        .bg(GREEN)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}
