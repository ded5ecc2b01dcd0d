use chrono::NaiveDate;

use crate::audio::Voice;
use crate::config::Settings;
use crate::models::Prayer;
use crate::prayer_times::NextPrayer;

/// Decides when the automatic adhan plays.
///
/// Nothing fires until the user arms it. Once armed, a prayer fires during
/// its start minute if its notification flag is on, and only once per day.
#[derive(Debug, Default)]
pub struct AdhanTrigger {
    armed: bool,
    last_fired: Option<(NaiveDate, Prayer)>,
}

impl AdhanTrigger {
    pub fn new(armed: bool) -> Self {
        Self {
            armed,
            last_fired: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_armed(&mut self, armed: bool) {
        if armed != self.armed {
            log::info!("[Trigger] Auto-adhan {}", if armed { "armed" } else { "disarmed" });
        }
        self.armed = armed;
    }

    pub fn toggle_armed(&mut self) {
        self.set_armed(!self.armed);
    }

    /// Called on every tick. Returns the prayer and voice to play when the
    /// adhan is due, and records it so later ticks in the same minute (or
    /// later the same day) do not replay it.
    pub fn evaluate(
        &mut self,
        today: NaiveDate,
        next: &NextPrayer,
        settings: &Settings,
    ) -> Option<(Prayer, Voice)> {
        if !self.armed || !next.is_due() {
            return None;
        }
        let prayer = next.prayer;
        if !settings.notifications.enabled(prayer) {
            return None;
        }
        if self.last_fired == Some((today, prayer)) {
            return None;
        }

        self.last_fired = Some((today, prayer));
        let voice = settings.audio_sources.get(prayer);
        log::info!("[Trigger] {} is due, calling adhan ({})", prayer, voice.as_str());
        Some((prayer, voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timings::sample_timings;
    use crate::prayer_times::next_prayer;
    use chrono::NaiveTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn next_at(h: u32, m: u32, s: u32) -> NextPrayer {
        next_prayer(&sample_timings(), NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn fires_once_across_ticks_in_the_start_minute() {
        let settings = Settings::default();
        let mut trigger = AdhanTrigger::new(true);

        let fired: Vec<_> = (0..60)
            .filter_map(|s| trigger.evaluate(day(19), &next_at(12, 0, s), &settings))
            .collect();

        assert_eq!(fired, vec![(Prayer::Dhuhr, Voice::Makkah)]);
        assert_eq!(trigger.last_fired, Some((day(19), Prayer::Dhuhr)));
    }

    #[test]
    fn nothing_fires_before_the_start_minute() {
        let mut trigger = AdhanTrigger::new(true);
        assert!(trigger
            .evaluate(day(19), &next_at(11, 59, 59), &Settings::default())
            .is_none());
        assert!(trigger.last_fired.is_none());
    }

    #[test]
    fn disarmed_trigger_never_fires() {
        let mut trigger = AdhanTrigger::new(false);
        assert!(trigger
            .evaluate(day(19), &next_at(15, 30, 0), &Settings::default())
            .is_none());

        trigger.toggle_armed();
        assert!(trigger
            .evaluate(day(19), &next_at(15, 30, 1), &Settings::default())
            .is_some());
    }

    #[test]
    fn disabled_notification_suppresses_that_prayer_only() {
        let mut settings = Settings::default();
        settings.toggle_notification(Prayer::Asr);
        let mut trigger = AdhanTrigger::new(true);

        assert!(trigger.evaluate(day(19), &next_at(15, 30, 0), &settings).is_none());
        assert_eq!(
            trigger.evaluate(day(19), &next_at(18, 0, 0), &settings),
            Some((Prayer::Maghrib, Voice::Makkah))
        );
    }

    #[test]
    fn uses_the_prayers_configured_voice() {
        let mut settings = Settings::default();
        settings.set_voice(Prayer::Isha, Voice::Mishary);
        let mut trigger = AdhanTrigger::new(true);
        assert_eq!(
            trigger.evaluate(day(19), &next_at(20, 0, 5), &settings),
            Some((Prayer::Isha, Voice::Mishary))
        );
    }

    #[test]
    fn same_prayer_fires_again_the_next_day() {
        // Only Fajr enabled: the marker stays on Fajr between days
        let mut settings = Settings::default();
        for p in [Prayer::Dhuhr, Prayer::Asr, Prayer::Maghrib, Prayer::Isha] {
            settings.toggle_notification(p);
        }
        let mut trigger = AdhanTrigger::new(true);

        assert!(trigger.evaluate(day(19), &next_at(5, 0, 0), &settings).is_some());
        assert!(trigger.evaluate(day(19), &next_at(5, 0, 30), &settings).is_none());
        assert!(trigger.evaluate(day(20), &next_at(5, 0, 0), &settings).is_some());
    }
}
