use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, List, ListItem},
    Frame,
};

use crate::audio::Playback;
use crate::config::Settings;
use crate::config::prefs::method_short_name;
use crate::models::Prayer;
use crate::tui::theme;

/// Rows of the settings panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    School,
    Method,
    Voice(Prayer),
}

impl SettingsRow {
    pub const COUNT: usize = 2 + Prayer::ALL.len();

    pub fn at(idx: usize) -> SettingsRow {
        match idx {
            0 => SettingsRow::School,
            1 => SettingsRow::Method,
            i => SettingsRow::Voice(Prayer::ALL[(i - 2).min(Prayer::ALL.len() - 1)]),
        }
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    settings: &Settings,
    selected: usize,
    playing: Option<Playback>,
) {
    frame.render_widget(Clear, area);

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        "  CALCULATION",
        theme::dim().add_modifier(Modifier::BOLD),
    )))];

    for idx in 0..SettingsRow::COUNT {
        let row = SettingsRow::at(idx);
        if idx == 2 {
            items.push(ListItem::new(Line::from("")));
            items.push(ListItem::new(Line::from(Span::styled(
                "  MUAZZIN VOICE",
                theme::dim().add_modifier(Modifier::BOLD),
            ))));
        }

        let marker = if idx == selected { "▸ " } else { "  " };
        let (label, value, value_style) = match row {
            SettingsRow::School => (
                "Asr Method".to_string(),
                settings.school.label().to_string(),
                theme::accent(),
            ),
            SettingsRow::Method => (
                "Authority".to_string(),
                method_short_name(settings.method),
                theme::violet(),
            ),
            SettingsRow::Voice(prayer) => (
                prayer.display_name().to_string(),
                settings.audio_sources.get(prayer).label().to_string(),
                theme::bold(),
            ),
        };

        let mut spans = vec![
            Span::styled(marker, theme::accent()),
            Span::styled(format!("{:<12}", label), theme::dim()),
            Span::styled(value, value_style),
        ];
        if let SettingsRow::Voice(prayer) = row {
            if playing == Some(Playback::Preview(prayer)) {
                spans.push(Span::styled("  ■ stop", theme::red()));
            }
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    items.push(ListItem::new(Line::from("")));
    items.push(ListItem::new(Line::from(Span::styled(
        "  [↵] change  [p] preview  [Esc] close",
        theme::dim(),
    ))));

    let list = List::new(items).block(theme::panel(" Settings ", true));
    frame.render_widget(list, area);
}
