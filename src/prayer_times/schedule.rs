use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{Prayer, Timings};
use crate::utils::format::format_countdown;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Source of local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub prayer: Prayer,
    pub time: NaiveTime,
    /// Whole minutes from the current minute to the prayer's start minute.
    pub diff_minutes: u32,
    pub is_tomorrow: bool,
}

impl NextPrayer {
    /// True during the prayer's own start minute.
    pub fn is_due(&self) -> bool {
        self.diff_minutes == 0
    }

    pub fn countdown(&self, now: NaiveTime) -> String {
        format_countdown(self.diff_minutes, now.second())
    }
}

fn minute_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// The next prayer at `now`. A prayer whose start minute is the current
/// minute is returned with a zero diff for the whole of that minute. Once
/// Isha's minute has passed, today's Fajr time stands in for tomorrow's.
pub fn next_prayer(timings: &Timings, now: NaiveTime) -> NextPrayer {
    let now_min = minute_of_day(now);

    let upcoming = Prayer::all()
        .map(|p| (p, timings.get(p)))
        .map(|(p, t)| (p, t, minute_of_day(t) - now_min))
        .filter(|(_, _, diff)| *diff >= 0)
        // min_by_key keeps the first of equal keys, so order breaks ties
        .min_by_key(|(_, _, diff)| *diff);

    match upcoming {
        Some((prayer, time, diff)) => NextPrayer {
            prayer,
            time,
            diff_minutes: diff as u32,
            is_tomorrow: false,
        },
        None => {
            let fajr = timings.fajr;
            let diff = MINUTES_PER_DAY - now_min + minute_of_day(fajr);
            NextPrayer {
                prayer: Prayer::Fajr,
                time: fajr,
                diff_minutes: diff as u32,
                is_tomorrow: true,
            }
        }
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub std::cell::Cell<NaiveDateTime>);

#[cfg(test)]
impl FixedClock {
    pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Self {
        let dt = chrono::NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap();
        Self(std::cell::Cell::new(dt))
    }

    pub fn advance_secs(&self, secs: i64) {
        self.0.set(self.0.get() + chrono::Duration::seconds(secs));
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timings::sample_timings;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn afternoon_picks_asr() {
        let next = next_prayer(&sample_timings(), at(13, 0));
        assert_eq!(next.prayer, Prayer::Asr);
        assert_eq!(next.diff_minutes, 150);
        assert!(!next.is_tomorrow);
    }

    #[test]
    fn before_fajr_picks_todays_fajr() {
        let next = next_prayer(&sample_timings(), at(3, 30));
        assert_eq!(next.prayer, Prayer::Fajr);
        assert_eq!(next.diff_minutes, 90);
        assert!(!next.is_tomorrow);
    }

    #[test]
    fn after_isha_wraps_to_fajr_tomorrow() {
        let next = next_prayer(&sample_timings(), at(21, 0));
        assert_eq!(next.prayer, Prayer::Fajr);
        assert!(next.is_tomorrow);
        // 3h to midnight + 5h to Fajr
        assert_eq!(next.diff_minutes, 480);
    }

    #[test]
    fn start_minute_reports_zero_diff() {
        let timings = sample_timings();
        let next = next_prayer(&timings, NaiveTime::from_hms_opt(15, 30, 42).unwrap());
        assert_eq!(next.prayer, Prayer::Asr);
        assert!(next.is_due());

        let next = next_prayer(&timings, at(15, 31));
        assert_eq!(next.prayer, Prayer::Maghrib);
        assert_eq!(next.diff_minutes, 149);
    }

    #[test]
    fn sunrise_is_never_next() {
        // Between Fajr and Sunrise the next prayer is Dhuhr
        let next = next_prayer(&sample_timings(), at(6, 0));
        assert_eq!(next.prayer, Prayer::Dhuhr);
        assert_eq!(next.diff_minutes, 360);
    }

    #[test]
    fn every_minute_of_the_day_has_a_next_prayer() {
        let timings = sample_timings();
        for minute in 0..(24 * 60) {
            let now = at(minute / 60, minute % 60);
            let next = next_prayer(&timings, now);
            let target = minute_of_day(next.time);
            let expected = if next.is_tomorrow {
                MINUTES_PER_DAY - i64::from(minute) + target
            } else {
                target - i64::from(minute)
            };
            assert_eq!(i64::from(next.diff_minutes), expected, "at minute {}", minute);
        }
    }

    #[test]
    fn countdown_text() {
        let next = next_prayer(&sample_timings(), at(13, 0));
        let now = NaiveTime::from_hms_opt(13, 0, 15).unwrap();
        assert_eq!(next.countdown(now), "2h 30m 44s");
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::at(2026, 10, 19, 23, 59, 59);
        clock.advance_secs(1);
        assert_eq!(clock.now().time(), at(0, 0));
    }
}
