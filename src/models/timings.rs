use chrono::NaiveTime;

use crate::models::Prayer;

/// One day's start times, as returned by the timings API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

impl Timings {
    pub fn get(&self, prayer: Prayer) -> NaiveTime {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Start and end of the time in which `prayer` may be performed.
    pub fn window(&self, prayer: Prayer) -> PrayerWindow {
        let (end, end_label) = match prayer {
            Prayer::Fajr => (self.sunrise, "Ends"),
            Prayer::Dhuhr => (self.asr, "Ends"),
            Prayer::Asr => (self.maghrib, "Ends"),
            Prayer::Maghrib => (self.isha, "Ends"),
            // Isha runs until the following Fajr
            Prayer::Isha => (self.fajr, "Ends (Fajr)"),
        };
        PrayerWindow {
            start: self.get(prayer),
            end,
            end_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub end_label: &'static str,
}

#[cfg(test)]
pub(crate) fn sample_timings() -> Timings {
    let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    Timings {
        fajr: t(5, 0),
        sunrise: t(6, 40),
        dhuhr: t(12, 0),
        asr: t(15, 30),
        maghrib: t(18, 0),
        isha: t(20, 0),
    }
}
