use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MAKKAH_URL: &str = "https://cdn.jsdelivr.net/gh/achaudhry/adhan@master/Adhan-Makkah.mp3";
const MADINA_URL: &str = "https://cdn.jsdelivr.net/gh/achaudhry/adhan@master/Adhan-Madinah.mp3";
const MISHARY_URL: &str =
    "https://cdn.jsdelivr.net/gh/achaudhry/adhan@master/Adhan-Mishary-Rashid-Al-Afasy.mp3";

/// Muazzin recording used for the adhan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Voice {
    #[default]
    Makkah,
    Madina,
    Mishary,
}

impl Voice {
    pub const ALL: [Voice; 3] = [Voice::Makkah, Voice::Madina, Voice::Mishary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Makkah => "makkah",
            Voice::Madina => "madina",
            Voice::Mishary => "mishary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Voice::Makkah => "Makkah (Ali Mulla)",
            Voice::Madina => "Madina (E. Bukhari)",
            Voice::Mishary => "Mishary Alafasy",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Voice::Makkah => MAKKAH_URL,
            Voice::Madina => MADINA_URL,
            Voice::Mishary => MISHARY_URL,
        }
    }

    pub fn next(&self) -> Voice {
        match self {
            Voice::Makkah => Voice::Madina,
            Voice::Madina => Voice::Mishary,
            Voice::Mishary => Voice::Makkah,
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Voice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "makkah" => Ok(Voice::Makkah),
            "madina" | "madinah" => Ok(Voice::Madina),
            "mishary" => Ok(Voice::Mishary),
            _ => {
                let names: Vec<&str> = Voice::ALL.iter().map(|v| v.as_str()).collect();
                Err(anyhow::anyhow!("Unknown voice '{}'. Use: {}", s, names.join(", ")))
            }
        }
    }
}

// Stored blobs may carry a voice id this build does not know; play Makkah.
impl From<String> for Voice {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<Voice> for String {
    fn from(v: Voice) -> Self {
        v.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stored_voice_falls_back_to_makkah() {
        let v: Voice = serde_json::from_str("\"sudais\"").unwrap();
        assert_eq!(v, Voice::Makkah);
        let v: Voice = serde_json::from_str("\"mishary\"").unwrap();
        assert_eq!(v, Voice::Mishary);
    }

    #[test]
    fn serializes_as_lowercase_id() {
        assert_eq!(serde_json::to_string(&Voice::Madina).unwrap(), "\"madina\"");
    }

    #[test]
    fn cycle_visits_every_voice() {
        let mut v = Voice::Makkah;
        let mut seen = vec![v];
        for _ in 0..2 {
            v = v.next();
            seen.push(v);
        }
        assert_eq!(seen, Voice::ALL.to_vec());
        assert_eq!(v.next(), Voice::Makkah);
    }
}
