use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::audio::Voice;
use crate::models::{Prayer, PrayerWindow};
use crate::tui::theme;
use crate::utils::format::format_12_hour;

/// Side panel with the focused prayer's window and adhan preferences.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    prayer: Prayer,
    window: Option<&PrayerWindow>,
    notify: bool,
    voice: Voice,
) {
    frame.render_widget(Clear, area);

    let glyph = if prayer.is_night() { "☾" } else { "☀" };
    let (start, end, end_label) = match window {
        Some(w) => (format_12_hour(w.start), format_12_hour(w.end), w.end_label),
        None => ("--:--".to_string(), "--:--".to_string(), "Ends"),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {}  ", glyph), theme::gold()),
            Span::styled(prayer.display_name(), theme::bold().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled("  PRAYER DETAILS", theme::dim())),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Begins"), theme::dim()),
            Span::styled(start, theme::bold()),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<14}", end_label), theme::dim()),
            Span::styled(end, theme::bold()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Notification"), theme::dim()),
            if notify {
                Span::styled("on", theme::green())
            } else {
                Span::styled("off", theme::red())
            },
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Muazzin"), theme::dim()),
            Span::styled(voice.label(), theme::accent()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  [n] notify  [v] voice  [p] preview  [Esc] close",
            theme::dim(),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(theme::panel(" Details ", true));
    frame.render_widget(paragraph, area);
}
