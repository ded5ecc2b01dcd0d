use anyhow::{anyhow, Result};
use chrono::{NaiveTime, Timelike};

/// Parse an "HH:MM" string. Anything after the first whitespace is ignored,
/// so annotated values like "05:12 (BST)" parse as 05:12.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    let head = s.split_whitespace().next().unwrap_or("");
    NaiveTime::parse_from_str(head, "%H:%M").map_err(|_| anyhow!("Invalid time: '{}'", s))
}

#[allow(dead_code)]
/// Convert "HH:MM" to 12-hour form: "13:05" -> "1:05 PM". Empty stays empty.
pub fn to_12_hour(hhmm: &str) -> Result<String> {
    if hhmm.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(format_12_hour(parse_hhmm(hhmm)?))
}

pub fn format_12_hour(t: NaiveTime) -> String {
    let (pm, h12) = t.hour12();
    let suffix = if pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", h12, t.minute(), suffix)
}

/// Countdown text "{h}h {m}m {s}s". The seconds part is what is left of the
/// current wall-clock minute, not a true sub-minute distance to the target.
pub fn format_countdown(diff_minutes: u32, second_of_minute: u32) -> String {
    let hours = diff_minutes / 60;
    let minutes = diff_minutes % 60;
    let seconds = 59u32.saturating_sub(second_of_minute);
    format!("{}h {}m {}s", hours, minutes, seconds)
}

/// Short form used by the big countdown: "02:30:59".
pub fn format_countdown_compact(diff_minutes: u32, second_of_minute: u32) -> String {
    let seconds = 59u32.saturating_sub(second_of_minute);
    format!(
        "{:02}:{:02}:{:02}",
        diff_minutes / 60,
        diff_minutes % 60,
        seconds
    )
}
