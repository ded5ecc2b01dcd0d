use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

pub const BG: Color = Color::Rgb(14, 16, 24);
pub const SURFACE: Color = Color::Rgb(24, 26, 38);
pub const BORDER: Color = Color::Rgb(48, 52, 72);
pub const TEXT: Color = Color::Rgb(226, 228, 240);
pub const TEXT_DIM: Color = Color::Rgb(120, 126, 150);
pub const ACCENT: Color = Color::Rgb(96, 165, 250);
pub const GOLD: Color = Color::Rgb(196, 160, 68);
pub const GREEN: Color = Color::Rgb(16, 185, 129);
pub const VIOLET: Color = Color::Rgb(167, 139, 250);
pub const RED: Color = Color::Rgb(239, 68, 68);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn violet() -> Style {
    Style::default().fg(VIOLET)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

/// Rounded panel with a gold title, highlighted border when focused.
pub fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(ratatui::text::Span::styled(title, gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            accent()
        } else {
            Style::default().fg(BORDER)
        })
        .style(surface())
}
