use serde::{Deserialize, Serialize};

use crate::audio::Voice;
use crate::models::Prayer;

fn default_true() -> bool {
    true
}
fn default_method() -> u8 {
    METHOD_MWL
}

pub const METHOD_ISNA: u8 = 2;
pub const METHOD_MWL: u8 = 3;
pub const METHOD_MAKKAH: u8 = 4;

/// Calculation method ids understood by the timings API.
pub const CALC_METHODS: &[(u8, &str)] = &[
    (0, "Shia Ithna-Ashari"),
    (1, "University of Islamic Sciences, Karachi"),
    (2, "Islamic Society of North America"),
    (3, "Muslim World League"),
    (4, "Umm Al-Qura University, Makkah"),
    (5, "Egyptian General Authority of Survey"),
    (7, "Institute of Geophysics, University of Tehran"),
    (8, "Gulf Region"),
    (9, "Kuwait"),
    (10, "Qatar"),
    (11, "Majlis Ugama Islam Singapura"),
    (12, "Union Organization islamic de France"),
    (13, "Diyanet İşleri Başkanlığı, Turkey"),
    (14, "Spiritual Administration of Muslims of Russia"),
    (15, "Moonsighting Committee Worldwide"),
    (16, "Dubai"),
    (17, "JAKIM, Malaysia"),
    (18, "Tunisia"),
    (19, "Algeria"),
    (20, "KEMENAG, Indonesia"),
    (21, "Morocco"),
    (22, "Comunidade Islamica de Lisboa"),
    (23, "Ministry of Awqaf, Jordan"),
];

pub fn method_name(id: u8) -> &'static str {
    CALC_METHODS
        .iter()
        .find(|(m, _)| *m == id)
        .map(|(_, name)| *name)
        .unwrap_or("Custom")
}

/// Short label shown in the settings panel.
pub fn method_short_name(id: u8) -> String {
    match id {
        METHOD_MWL => "MWL".to_string(),
        METHOD_ISNA => "ISNA".to_string(),
        METHOD_MAKKAH => "Makkah".to_string(),
        other => format!("#{}", other),
    }
}

/// MWL -> ISNA -> Makkah -> MWL. Anything else goes back to MWL.
pub fn next_method(id: u8) -> u8 {
    match id {
        METHOD_MWL => METHOD_ISNA,
        METHOD_ISNA => METHOD_MAKKAH,
        _ => METHOD_MWL,
    }
}

/// Juristic school used for the Asr shadow length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AsrSchool {
    Standard,
    #[default]
    Hanafi,
}

impl AsrSchool {
    pub fn id(&self) -> u8 {
        match self {
            AsrSchool::Standard => 0,
            AsrSchool::Hanafi => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AsrSchool::Standard => "Standard",
            AsrSchool::Hanafi => "Hanafi",
        }
    }

    pub fn toggled(&self) -> AsrSchool {
        match self {
            AsrSchool::Standard => AsrSchool::Hanafi,
            AsrSchool::Hanafi => AsrSchool::Standard,
        }
    }
}

impl TryFrom<u8> for AsrSchool {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(AsrSchool::Standard),
            1 => Ok(AsrSchool::Hanafi),
            _ => Err(format!("Unknown Asr school: {}", v)),
        }
    }
}

impl From<AsrSchool> for u8 {
    fn from(s: AsrSchool) -> Self {
        s.id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    #[serde(rename = "Fajr", default = "default_true")]
    pub fajr: bool,
    #[serde(rename = "Dhuhr", default = "default_true")]
    pub dhuhr: bool,
    #[serde(rename = "Asr", default = "default_true")]
    pub asr: bool,
    #[serde(rename = "Maghrib", default = "default_true")]
    pub maghrib: bool,
    #[serde(rename = "Isha", default = "default_true")]
    pub isha: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            fajr: true,
            dhuhr: true,
            asr: true,
            maghrib: true,
            isha: true,
        }
    }
}

impl NotificationPrefs {
    pub fn enabled(&self, prayer: Prayer) -> bool {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    fn slot(&mut self, prayer: Prayer) -> &mut bool {
        match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        }
    }

    pub fn set(&mut self, prayer: Prayer, on: bool) {
        *self.slot(prayer) = on;
    }

    pub fn toggle(&mut self, prayer: Prayer) {
        let slot = self.slot(prayer);
        *slot = !*slot;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoicePrefs {
    #[serde(rename = "Fajr", default)]
    pub fajr: Voice,
    #[serde(rename = "Dhuhr", default)]
    pub dhuhr: Voice,
    #[serde(rename = "Asr", default)]
    pub asr: Voice,
    #[serde(rename = "Maghrib", default)]
    pub maghrib: Voice,
    #[serde(rename = "Isha", default)]
    pub isha: Voice,
}

impl VoicePrefs {
    pub fn get(&self, prayer: Prayer) -> Voice {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    pub fn set(&mut self, prayer: Prayer, voice: Voice) {
        let slot = match prayer {
            Prayer::Fajr => &mut self.fajr,
            Prayer::Dhuhr => &mut self.dhuhr,
            Prayer::Asr => &mut self.asr,
            Prayer::Maghrib => &mut self.maghrib,
            Prayer::Isha => &mut self.isha,
        };
        *slot = voice;
    }
}

/// User-facing preferences persisted as one JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub notifications: NotificationPrefs,
    #[serde(default)]
    pub school: AsrSchool,
    #[serde(default = "default_method")]
    pub method: u8,
    #[serde(default)]
    pub audio_sources: VoicePrefs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: NotificationPrefs::default(),
            school: AsrSchool::default(),
            method: default_method(),
            audio_sources: VoicePrefs::default(),
        }
    }
}

impl Settings {
    pub fn toggle_notification(&mut self, prayer: Prayer) {
        self.notifications.toggle(prayer);
    }

    pub fn set_voice(&mut self, prayer: Prayer, voice: Voice) {
        self.audio_sources.set(prayer, voice);
    }

    pub fn cycle_voice(&mut self, prayer: Prayer) {
        let next = self.audio_sources.get(prayer).next();
        self.audio_sources.set(prayer, next);
    }

    pub fn toggle_school(&mut self) {
        self.school = self.school.toggled();
    }

    pub fn cycle_method(&mut self) {
        self.method = next_method(self.method);
    }
}
