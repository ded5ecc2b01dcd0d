use chrono::{NaiveTime, Timelike};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::prayer_times::{FetchState, NextPrayer};
use crate::tui::theme;
use crate::utils::format::{format_12_hour, format_countdown_compact};

// Quadrant pixels: each glyph is 4 columns wide
const GLYPH_WIDTH: u16 = 4;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: &FetchState,
    next: Option<&NextPrayer>,
    now: NaiveTime,
) {
    let block = theme::panel(" Next Prayer ", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let next = match (state, next) {
        (FetchState::Failed(msg), _) => {
            return message(frame, inner, Span::styled(msg.as_str(), theme::red()));
        }
        (FetchState::Ready(_), Some(next)) => next,
        _ => {
            return message(frame, inner, Span::styled("Loading...", theme::dim()));
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // name
            Constraint::Length(4), // countdown
            Constraint::Min(0),    // start time
        ])
        .split(inner);

    let name = Paragraph::new(Line::from(Span::styled(
        next.prayer.display_name().to_uppercase(),
        theme::gold().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(name, rows[0]);

    let digits = format_countdown_compact(next.diff_minutes, now.second());
    let width = (digits.chars().count() as u16 * GLYPH_WIDTH).min(rows[1].width);
    let countdown_area = Rect {
        x: rows[1].x + (rows[1].width - width) / 2,
        width,
        ..rows[1]
    };
    let style = if next.is_due() {
        theme::green()
    } else {
        theme::accent()
    };
    let big = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(style)
        .lines(vec![Line::from(digits)])
        .build();
    frame.render_widget(big, countdown_area);

    let mut when = vec![
        Span::styled(next.countdown(now), theme::bold()),
        Span::styled("  ·  at ", theme::dim()),
        Span::styled(format_12_hour(next.time), theme::bold()),
    ];
    if next.is_tomorrow {
        when.push(Span::styled("  (tomorrow)", theme::dim()));
    }
    if next.is_due() {
        when = vec![Span::styled("It is time", theme::green().add_modifier(Modifier::BOLD))];
    }
    let footer = Paragraph::new(Line::from(when)).alignment(Alignment::Center);
    frame.render_widget(footer, rows[2]);
}

fn message(frame: &mut Frame, area: Rect, span: Span) {
    let text = vec![Line::from(""), Line::from(span)];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}
