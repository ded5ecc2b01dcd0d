use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::config::Settings;
use crate::models::{Prayer, Timings};
use crate::tui::theme;
use crate::utils::format::format_12_hour;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    timings: Option<&Timings>,
    settings: &Settings,
    next: Option<Prayer>,
    focused_idx: usize,
) {
    let block = theme::panel(" Prayers ", false);

    let items: Vec<ListItem> = Prayer::all()
        .enumerate()
        .map(|(i, prayer)| {
            let is_focused = i == focused_idx;
            let is_next = next == Some(prayer);

            let time_str = timings
                .map(|t| format_12_hour(t.get(prayer)))
                .unwrap_or_else(|| "--:--".to_string());

            let (bell, bell_style) = if settings.notifications.enabled(prayer) {
                ("🔔", theme::accent())
            } else {
                ("🔕", theme::dim())
            };

            let marker = if is_focused { "▸ " } else { "  " };
            let name_style = if is_next {
                theme::gold().add_modifier(Modifier::BOLD)
            } else if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };
            let time_style = if is_next { theme::bold() } else { theme::dim() };

            let line = Line::from(vec![
                Span::styled(marker, theme::accent()),
                Span::styled(bell, bell_style),
                Span::styled(format!("  {:<9}", prayer.display_name()), name_style),
                Span::styled(format!("{:>9}", time_str), time_style),
                Span::styled(if is_next { "  ◂ next" } else { "" }, theme::gold()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
