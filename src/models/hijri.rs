use serde::{Deserialize, Serialize};

/// Hijri date as reported alongside the day's timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: String,
    pub month_name: String,
    pub year: String,
    pub weekday: String,
    pub designation: String,
    pub holidays: Vec<String>,
}

impl HijriDate {
    pub fn formatted(&self) -> String {
        // API pads the day ("08"); display it bare
        let day = self.day.trim_start_matches('0');
        let day = if day.is_empty() { "0" } else { day };
        if self.designation.is_empty() {
            format!("{} {} {}", day, self.month_name, self.year)
        } else {
            format!("{} {} {} {}", day, self.month_name, self.year, self.designation)
        }
    }
}
