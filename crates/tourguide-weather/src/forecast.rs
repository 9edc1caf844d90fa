//! Open-Meteo response decoding.

use chrono::{Duration, NaiveDateTime, Utc};
use serde::Deserialize;
use tourguide_common::CollaboratorError;

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Known(Forecast),
    Unknown,
}

impl WeatherReport {
    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            WeatherReport::Known(f) => Some(f),
            WeatherReport::Unknown => None,
        }
    }
}

/// Current temperature plus hourly precipitation probability, with hourly
/// times in the location's local time.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub temperature_c: f64,
    pub hourly: Vec<(NaiveDateTime, f64)>,
    pub utc_offset_secs: i32,
}

impl Forecast {
    /// Precipitation probability of the hourly slot nearest to `now`
    /// (location-local time). Ties go to the earlier slot.
    pub fn precipitation_near(&self, now: NaiveDateTime) -> Option<f64> {
        self.hourly
            .iter()
            .min_by_key(|(t, _)| (*t - now).num_seconds().abs())
            .map(|(_, p)| *p)
    }

    /// [`Forecast::precipitation_near`] evaluated at the current local time.
    pub fn precipitation_now(&self) -> Option<f64> {
        let local = Utc::now().naive_utc() + Duration::seconds(i64::from(self.utc_offset_secs));
        self.precipitation_near(local)
    }
}

#[derive(Deserialize)]
struct RawForecast {
    current_weather: Option<RawCurrent>,
    hourly: Option<RawHourly>,
    #[serde(default)]
    utc_offset_seconds: i32,
}

#[derive(Deserialize)]
struct RawCurrent {
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct RawHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn malformed(reason: impl Into<String>) -> CollaboratorError {
    CollaboratorError::Malformed {
        what: "weather response",
        reason: reason.into(),
    }
}

/// Decode a forecast body. Hourly slots with an unparsable time or a null
/// probability are skipped; a missing current temperature is an error.
pub fn parse_forecast(body: &str) -> Result<Forecast, CollaboratorError> {
    let raw: RawForecast = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    let temperature_c = raw
        .current_weather
        .and_then(|c| c.temperature)
        .ok_or_else(|| malformed("missing current_weather.temperature"))?;

    let hourly = raw
        .hourly
        .map(|h| {
            h.time
                .iter()
                .zip(h.precipitation_probability)
                .filter_map(|(t, p)| Some((parse_time(t)?, p?)))
                .collect()
        })
        .unwrap_or_default();

    Ok(Forecast {
        temperature_c,
        hourly,
        utc_offset_secs: raw.utc_offset_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FIXTURE: &str = r#"{
        "latitude": 10.75,
        "longitude": 106.375,
        "utc_offset_seconds": 25200,
        "timezone": "Asia/Bangkok",
        "current_weather": {"temperature": 31.4, "windspeed": 9.2, "weathercode": 2},
        "hourly": {
            "time": ["2026-10-19T13:00", "2026-10-19T14:00", "2026-10-19T15:00", "bad"],
            "precipitation_probability": [10, 45, null, 80]
        }
    }"#;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_fixture() {
        let forecast = parse_forecast(FIXTURE).unwrap();
        assert_eq!(forecast.temperature_c, 31.4);
        assert_eq!(forecast.utc_offset_secs, 25200);
        assert_eq!(forecast.hourly, vec![(at(13, 0), 10.0), (at(14, 0), 45.0)]);
    }

    #[test]
    fn nearest_hour_wins() {
        let forecast = parse_forecast(FIXTURE).unwrap();
        assert_eq!(forecast.precipitation_near(at(13, 20)), Some(10.0));
        assert_eq!(forecast.precipitation_near(at(13, 40)), Some(45.0));
        assert_eq!(forecast.precipitation_near(at(13, 30)), Some(10.0));
        assert_eq!(forecast.precipitation_near(at(23, 0)), Some(45.0));
    }

    #[test]
    fn no_hourly_data() {
        let forecast = parse_forecast(r#"{"current_weather": {"temperature": 28}}"#).unwrap();
        assert!(forecast.hourly.is_empty());
        assert_eq!(forecast.precipitation_near(at(12, 0)), None);
    }

    #[test]
    fn missing_temperature_is_malformed() {
        let err = parse_forecast(r#"{"hourly": {"time": [], "precipitation_probability": []}}"#)
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Malformed { .. }));
        assert!(parse_forecast("<html>").is_err());
    }
}
