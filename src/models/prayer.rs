use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five daily prayers, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn all() -> impl Iterator<Item = Prayer> {
        Self::ALL.into_iter()
    }

    /// Key used by the timings API and the settings blob.
    pub fn api_key(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.api_key()
    }

    pub fn index(&self) -> usize {
        match self {
            Prayer::Fajr => 0,
            Prayer::Dhuhr => 1,
            Prayer::Asr => 2,
            Prayer::Maghrib => 3,
            Prayer::Isha => 4,
        }
    }

    /// Night-time prayers get a moon glyph in the UI, the rest a sun.
    pub fn is_night(&self) -> bool {
        matches!(self, Prayer::Fajr | Prayer::Maghrib | Prayer::Isha)
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Prayer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(Prayer::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(Prayer::Dhuhr),
            "asr" => Ok(Prayer::Asr),
            "maghrib" => Ok(Prayer::Maghrib),
            "isha" => Ok(Prayer::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("FAJR".parse::<Prayer>().unwrap(), Prayer::Fajr);
        assert_eq!("zuhr".parse::<Prayer>().unwrap(), Prayer::Dhuhr);
        assert_eq!("Dhuhr".parse::<Prayer>().unwrap(), Prayer::Dhuhr);
        assert!("sunrise".parse::<Prayer>().is_err());
    }

    #[test]
    fn order_is_chronological() {
        let indices: Vec<usize> = Prayer::all().map(|p| p.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(Prayer::ALL[0], Prayer::Fajr);
        assert_eq!(Prayer::ALL[4], Prayer::Isha);
    }
}
