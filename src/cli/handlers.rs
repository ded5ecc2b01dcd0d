use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{self, Playback, Voice};
use crate::cli::args::SettingsCommands;
use crate::config::prefs::{method_name, method_short_name};
use crate::config::{AppConfig, Settings, SettingsStore};
use crate::models::Prayer;
use crate::prayer_times::{
    next_prayer, DayTimings, PrayerTimesProvider, TimingsRequest, TimingsSource,
};
use crate::utils::format::format_12_hour;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(config: &mut AppConfig) -> Result<()> {
    println!();
    println_colored!(GOLD, "  waqt setup");
    println!();

    let city = prompt(&format!("  City [{}]: ", config.location.city))?;
    if !city.trim().is_empty() {
        config.location.city = city.trim().to_string();
    }
    let country = prompt(&format!("  Country [{}]: ", config.location.country))?;
    if !country.trim().is_empty() {
        config.location.country = country.trim().to_string();
    }

    config.save()?;
    println!();
    println_colored!(
        GREEN,
        "  ✓ Saved {} to {:?}",
        config.location.label(),
        AppConfig::config_path()?
    );
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

/// Fetch one day synchronously, waiting at most the configured API timeout
/// plus a little slack for the worker thread.
pub fn fetch_day(
    config: &AppConfig,
    settings: &Settings,
    source: Arc<dyn TimingsSource>,
    date: NaiveDate,
) -> Result<DayTimings> {
    let mut provider = PrayerTimesProvider::new(source);
    provider.request(TimingsRequest {
        date,
        city: config.location.city.clone(),
        country: config.location.country.clone(),
        method: settings.method,
        school: settings.school,
    });

    provider.wait(Duration::from_secs(config.api.timeout_secs + 5))?;
    match provider.day() {
        Some(day) => Ok(day.clone()),
        None => Err(anyhow!("{}", provider.error().unwrap_or("No prayer times"))),
    }
}

pub fn handle_times(
    config: &AppConfig,
    store: &SettingsStore,
    source: Arc<dyn TimingsSource>,
    now: NaiveDateTime,
) -> Result<()> {
    let settings = store.snapshot();
    let day = fetch_day(config, settings, source, now.date())?;
    let now_time = now.time();

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times · {} ({})",
        config.location.label(),
        now.date().format("%A, %-d %B %Y")
    );
    println_colored!(AMBER, "  {} · {}", day.hijri.weekday, day.hijri.formatted());
    for holiday in &day.hijri.holidays {
        println_colored!(GOLD, "  ✦ {}", holiday);
    }
    println!();

    let t = &day.timings;
    let rows = [
        ("Fajr", t.fajr, Some(Prayer::Fajr)),
        ("Sunrise", t.sunrise, None),
        ("Dhuhr", t.dhuhr, Some(Prayer::Dhuhr)),
        ("Asr", t.asr, Some(Prayer::Asr)),
        ("Maghrib", t.maghrib, Some(Prayer::Maghrib)),
        ("Isha", t.isha, Some(Prayer::Isha)),
    ];

    for (name, time, prayer) in rows {
        let bell = match prayer {
            Some(p) if settings.notifications.enabled(p) => "🔔",
            Some(_) => "🔕",
            None => "  ",
        };
        let line = format!("  {} {:<10} {:>9}", bell, name, format_12_hour(time));
        if time < now_time {
            println_colored!(DIM, "{}", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }

    print_next(&day, now);
    if let Some(method) = &day.method_name {
        println_colored!(DIM, "  {}", method);
    }
    println!();
    Ok(())
}

pub fn handle_next(
    config: &AppConfig,
    store: &SettingsStore,
    source: Arc<dyn TimingsSource>,
    now: NaiveDateTime,
) -> Result<()> {
    let day = fetch_day(config, store.snapshot(), source, now.date())?;
    print_next(&day, now);
    println!();
    Ok(())
}

fn print_next(day: &DayTimings, now: NaiveDateTime) {
    let next = next_prayer(&day.timings, now.time());
    println!();
    if next.is_due() {
        println_colored!(GREEN, "  It is time for {}", next.prayer);
        return;
    }
    let when = if next.is_tomorrow { " tomorrow" } else { "" };
    println_colored!(
        AMBER,
        "  Next: {} at {}{}, in {}",
        next.prayer,
        format_12_hour(next.time),
        when,
        next.countdown(now.time())
    );
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn handle_settings(store: &mut SettingsStore, action: Option<&SettingsCommands>) -> Result<()> {
    match action {
        None | Some(SettingsCommands::Show) => {}
        Some(SettingsCommands::Notify { prayer }) => {
            let prayer = parse_prayer(prayer)?;
            store.update(|s| s.toggle_notification(prayer))?;
            let on = store.snapshot().notifications.enabled(prayer);
            println_colored!(
                if on { GREEN } else { DIM },
                "  {} adhan notification {}",
                prayer,
                if on { "on" } else { "off" }
            );
        }
        Some(SettingsCommands::Voice { prayer, voice }) => {
            let prayer = parse_prayer(prayer)?;
            let voice = Voice::from_str(voice)?;
            store.update(|s| s.set_voice(prayer, voice))?;
            println_colored!(GREEN, "  ✓ {} will use {}", prayer, voice.label());
        }
        Some(SettingsCommands::School) => {
            store.update(|s| s.toggle_school())?;
            println_colored!(GREEN, "  ✓ Asr school: {}", store.snapshot().school.label());
        }
        Some(SettingsCommands::Method) => {
            store.update(|s| s.cycle_method())?;
            let id = store.snapshot().method;
            println_colored!(GREEN, "  ✓ Method: {} ({})", method_short_name(id), method_name(id));
        }
        Some(SettingsCommands::Reset) => {
            store.reset()?;
            println_colored!(GREEN, "  ✓ Settings restored to defaults");
        }
    }

    print_settings(store);
    Ok(())
}

fn print_settings(store: &SettingsStore) {
    let settings = store.snapshot();
    println!();
    println_colored!(GOLD, "  Settings");
    println_colored!(DIM, "  {}", store.path().display());
    println!();
    println!("  Asr method   {}", settings.school.label());
    println!(
        "  Authority    {} ({})",
        method_short_name(settings.method),
        method_name(settings.method)
    );
    println!();
    for prayer in Prayer::all() {
        let on = settings.notifications.enabled(prayer);
        let voice = settings.audio_sources.get(prayer);
        if on {
            println!("  🔔 {:<9} {}", prayer.display_name(), voice.label());
        } else {
            println_colored!(DIM, "  🔕 {:<9} {}", prayer.display_name(), voice.label());
        }
    }
    println!();
}

fn parse_prayer(s: &str) -> Result<Prayer> {
    Prayer::from_str(s)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", s))
}

// ─── Preview ─────────────────────────────────────────────────────────────────

pub fn handle_preview(config: &AppConfig, voice: &str) -> Result<()> {
    let voice = Voice::from_str(voice)?;
    let mut session = audio::open_session(config.audio.volume);

    // Previews are tied to a prayer row in the board; any row will do here
    session
        .start(Playback::Preview(Prayer::Fajr), voice)
        .with_context(|| format!("Playing {}", voice.label()))?;
    println_colored!(GREEN, "  ♪ {} (Ctrl-C to stop)", voice.label());

    while session.is_playing() {
        std::thread::sleep(Duration::from_millis(250));
    }
    println_colored!(DIM, "  done");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer_times::provider::fake::FakeSource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn fetch_day_sends_configured_location_and_settings() {
        let source = FakeSource::ok();
        let mut settings = Settings::default();
        settings.cycle_method();
        settings.toggle_school();

        let day = fetch_day(&AppConfig::default(), &settings, source.clone(), today()).unwrap();
        assert_eq!(day.date, today());

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].city, "Sheffield");
        assert_eq!(calls[0].method, 2);
        assert_eq!(calls[0].school, settings.school);
    }

    #[test]
    fn fetch_day_reports_the_single_user_message() {
        let err = fetch_day(
            &AppConfig::default(),
            &Settings::default(),
            FakeSource::failing(),
            today(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch prayer times");
    }

    #[test]
    fn prayer_names_parse_with_hint() {
        assert_eq!(parse_prayer("Isha").unwrap(), Prayer::Isha);
        let err = parse_prayer("witr").unwrap_err();
        assert!(err.to_string().contains("Use: fajr"));
    }
}
