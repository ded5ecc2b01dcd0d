use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::HijriDate;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    today: NaiveDate,
    location: &str,
    hijri: Option<&HijriDate>,
) {
    let gregorian_str = today.format("%A, %-d %B %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  وقت  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled(gregorian_str, theme::bold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(location.to_uppercase(), theme::dim()),
    ]);

    let mut hijri_spans = Vec::new();
    if let Some(h) = hijri {
        hijri_spans.push(Span::styled(h.formatted(), theme::accent()));
        for holiday in &h.holidays {
            hijri_spans.push(Span::styled("  ·  ", theme::dim()));
            hijri_spans.push(Span::styled(holiday.as_str(), theme::gold()));
        }
    } else {
        hijri_spans.push(Span::styled("—", theme::dim()));
    }

    let text = vec![title_line, Line::from(""), Line::from(hijri_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
