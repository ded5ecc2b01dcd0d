use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::AsrSchool;
use crate::config::settings::ApiConfig;
use crate::models::{HijriDate, Timings};
use crate::utils::format::parse_hhmm;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("timings API returned code {code} ({status})")]
    Api { code: u16, status: String },
    #[error("malformed timings response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("timings response is missing {0}")]
    MissingTiming(&'static str),
    #[error("invalid time '{value}' for {key}")]
    InvalidTime { key: &'static str, value: String },
}

impl FetchError {
    /// Every failure is shown to the user the same way; details go to the log.
    pub fn user_message(&self) -> &'static str {
        "Failed to fetch prayer times"
    }
}

/// Everything that decides which day's timings are wanted. A change in any
/// field means a new fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimingsRequest {
    pub date: NaiveDate,
    pub city: String,
    pub country: String,
    pub method: u8,
    pub school: AsrSchool,
}

/// One fetched day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTimings {
    pub date: NaiveDate,
    pub timings: Timings,
    pub hijri: HijriDate,
    pub method_name: Option<String>,
}

pub trait TimingsSource: Send + Sync {
    fn fetch(&self, req: &TimingsRequest) -> Result<DayTimings, FetchError>;
}

/// Blocking client for the Aladhan `timingsByCity` endpoint.
pub struct AladhanClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl AladhanClient {
    pub fn new(api: &ApiConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(concat!("waqt/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, date: NaiveDate) -> String {
        format!(
            "{}/timingsByCity/{}",
            self.base_url,
            date.format("%d-%m-%Y")
        )
    }
}

impl TimingsSource for AladhanClient {
    fn fetch(&self, req: &TimingsRequest) -> Result<DayTimings, FetchError> {
        let url = self.endpoint(req.date);
        log::debug!("[Provider] GET {} city={} country={}", url, req.city, req.country);

        let method = req.method.to_string();
        let school = req.school.id().to_string();
        let body = self
            .http
            .get(&url)
            .query(&[
                ("city", req.city.as_str()),
                ("country", req.country.as_str()),
                ("method", method.as_str()),
                ("school", school.as_str()),
            ])
            .send()?
            .text()?;

        parse_envelope(&body, req.date)
    }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope {
    code: u16,
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct DayData {
    timings: HashMap<String, String>,
    date: DateBlock,
    #[serde(default)]
    meta: Option<MetaBlock>,
}

#[derive(Deserialize)]
struct DateBlock {
    hijri: HijriBlock,
}

#[derive(Deserialize)]
struct HijriBlock {
    day: String,
    year: String,
    month: NamedMonth,
    #[serde(default)]
    weekday: Option<Named>,
    #[serde(default)]
    designation: Option<Designation>,
    #[serde(default)]
    holidays: Vec<String>,
}

#[derive(Deserialize)]
struct NamedMonth {
    en: String,
}

#[derive(Deserialize)]
struct Named {
    en: String,
}

#[derive(Deserialize)]
struct Designation {
    abbreviated: String,
}

#[derive(Deserialize)]
struct MetaBlock {
    #[serde(default)]
    method: Option<MethodBlock>,
}

#[derive(Deserialize)]
struct MethodBlock {
    name: String,
}

/// Decode a `timingsByCity` response body.
pub fn parse_envelope(body: &str, date: NaiveDate) -> Result<DayTimings, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.code != 200 {
        return Err(FetchError::Api {
            code: envelope.code,
            status: envelope.status,
        });
    }

    let data: DayData = serde_json::from_value(envelope.data)?;
    let timings = timings_from_map(&data.timings)?;
    let h = data.date.hijri;
    let hijri = HijriDate {
        day: h.day,
        month_name: h.month.en,
        year: h.year,
        weekday: h.weekday.map(|w| w.en).unwrap_or_default(),
        designation: h.designation.map(|d| d.abbreviated).unwrap_or_default(),
        holidays: h.holidays,
    };

    Ok(DayTimings {
        date,
        timings,
        hijri,
        method_name: data.meta.and_then(|m| m.method).map(|m| m.name),
    })
}

/// Build `Timings` from the API's name -> "HH:MM" map. All five prayers and
/// Sunrise must be present.
pub fn timings_from_map(map: &HashMap<String, String>) -> Result<Timings, FetchError> {
    let get = |key: &'static str| {
        let value = map.get(key).ok_or(FetchError::MissingTiming(key))?;
        parse_hhmm(value).map_err(|_| FetchError::InvalidTime {
            key,
            value: value.clone(),
        })
    };

    Ok(Timings {
        fajr: get("Fajr")?,
        sunrise: get("Sunrise")?,
        dhuhr: get("Dhuhr")?,
        asr: get("Asr")?,
        maghrib: get("Maghrib")?,
        isha: get("Isha")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const OK_BODY: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:00", "Sunrise": "06:40", "Dhuhr": "12:00",
                "Asr": "15:30", "Sunset": "17:58", "Maghrib": "18:00",
                "Isha": "20:00", "Imsak": "04:50", "Midnight": "00:05"
            },
            "date": {
                "readable": "19 Oct 2026",
                "hijri": {
                    "date": "08-05-1448",
                    "day": "08",
                    "weekday": {"en": "Al Athnayn", "ar": "الاثنين"},
                    "month": {"number": 5, "en": "Jumādá al-ūlá", "ar": "جُمادى الأولى"},
                    "year": "1448",
                    "designation": {"abbreviated": "AH", "expanded": "Anno Hegirae"},
                    "holidays": []
                }
            },
            "meta": {"method": {"id": 3, "name": "Muslim World League"}}
        }
    }"#;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn parses_successful_envelope() {
        let parsed = parse_envelope(OK_BODY, day()).unwrap();
        assert_eq!(parsed.date, day());
        assert_eq!(parsed.timings.asr, NaiveTime::from_hms_opt(15, 30, 0).unwrap());
        assert_eq!(parsed.timings.sunrise, NaiveTime::from_hms_opt(6, 40, 0).unwrap());
        assert_eq!(parsed.hijri.year, "1448");
        assert_eq!(parsed.hijri.weekday, "Al Athnayn");
        assert_eq!(parsed.method_name.as_deref(), Some("Muslim World League"));
    }

    #[test]
    fn non_200_code_is_an_api_error() {
        let body = r#"{"code": 400, "status": "BAD_REQUEST", "data": "Unable to find city"}"#;
        match parse_envelope(body, day()) {
            Err(FetchError::Api { code, status }) => {
                assert_eq!(code, 400);
                assert_eq!(status, "BAD_REQUEST");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn missing_sunrise_is_rejected() {
        let body = OK_BODY.replace("\"Sunrise\": \"06:40\",", "");
        assert!(matches!(
            parse_envelope(&body, day()),
            Err(FetchError::MissingTiming("Sunrise"))
        ));
    }

    #[test]
    fn garbage_time_is_rejected() {
        let body = OK_BODY.replace("\"Isha\": \"20:00\"", "\"Isha\": \"late\"");
        assert!(matches!(
            parse_envelope(&body, day()),
            Err(FetchError::InvalidTime { key: "Isha", .. })
        ));
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let err = parse_envelope("<html>502</html>", day()).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.user_message(), "Failed to fetch prayer times");
    }

    #[test]
    fn endpoint_uses_day_month_year() {
        let client = AladhanClient::new(&ApiConfig {
            base_url: "https://example.test/v1/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(
            client.endpoint(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()),
            "https://example.test/v1/timingsByCity/07-03-2026"
        );
    }
}
