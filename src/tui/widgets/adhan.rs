use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::audio::{Playback, Voice};
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    armed: bool,
    playing: Option<(Playback, Voice)>,
    next_voice: Option<Voice>,
) {
    let block = theme::panel(" Adhan ", armed);

    let switch = if armed {
        Line::from(vec![
            Span::styled("🔊 ", theme::green()),
            Span::styled("Auto-Adhan Active", theme::green().add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(vec![
            Span::styled("🔇 ", theme::dim()),
            Span::styled("Auto-Adhan off", theme::dim()),
            Span::styled("  [a] enable", theme::gold()),
        ])
    };

    let status = match playing {
        Some((Playback::Adhan(prayer), voice)) => Line::from(vec![
            Span::styled("♪ ", theme::accent()),
            Span::styled(format!("Playing {} adhan · {}", prayer, voice.label()), theme::accent()),
            Span::styled("  [x] stop", theme::gold()),
        ]),
        Some((Playback::Preview(prayer), voice)) => Line::from(vec![
            Span::styled("♪ ", theme::violet()),
            Span::styled(format!("Preview for {} · {}", prayer, voice.label()), theme::violet()),
            Span::styled("  [x] stop", theme::gold()),
        ]),
        None if armed => match next_voice {
            Some(voice) => Line::from(Span::styled(
                format!("Next: Adhan ({})", voice.label()),
                theme::dim(),
            )),
            None => Line::from(Span::styled("Standing by...", theme::dim())),
        },
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(vec![switch, status])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
