use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(msg) = message {
        let paragraph =
            Paragraph::new(Line::from(Span::styled(msg, theme::red()))).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let hints = [
        ("[↵]", " details  "),
        ("[n]", " notify  "),
        ("[v]", " voice  "),
        ("[p]", " preview  "),
        ("[a]", " auto-adhan  "),
        ("[s]", " settings  "),
        ("[?]", " help  "),
        ("[q]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
