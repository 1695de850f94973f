use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Parsed body of a WeatherAPI.com `current.json` response.
///
/// Deserializing checks every reading, so a decoded value always has every
/// field populated and within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Local wall-clock time at the location, as reported ("2024-05-01 14:30").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurrent")]
pub struct Current {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub precip_mm: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    /// Compass abbreviation, e.g. "NNW".
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_epoch: Option<i64>,
}

/// `current` exactly as sent, before range checks.
#[derive(Deserialize)]
struct RawCurrent {
    temp_c: f64,
    feelslike_c: f64,
    precip_mm: f64,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    pressure_mb: f64,
    condition: Condition,
    #[serde(default)]
    last_updated_epoch: Option<i64>,
}

impl TryFrom<RawCurrent> for Current {
    type Error = DecodeError;

    fn try_from(raw: RawCurrent) -> Result<Self, Self::Error> {
        if raw.precip_mm < 0.0 || raw.precip_mm.is_nan() {
            return Err(DecodeError::out_of_range("precip_mm", raw.precip_mm));
        }
        if raw.humidity > 100 {
            return Err(DecodeError::out_of_range("humidity", f64::from(raw.humidity)));
        }
        if raw.wind_kph < 0.0 || raw.wind_kph.is_nan() {
            return Err(DecodeError::out_of_range("wind_kph", raw.wind_kph));
        }
        if raw.pressure_mb <= 0.0 || raw.pressure_mb.is_nan() {
            return Err(DecodeError::out_of_range("pressure_mb", raw.pressure_mb));
        }

        Ok(Self {
            temp_c: raw.temp_c,
            feelslike_c: raw.feelslike_c,
            precip_mm: raw.precip_mm,
            humidity: raw.humidity,
            wind_kph: raw.wind_kph,
            wind_dir: raw.wind_dir,
            pressure_mb: raw.pressure_mb,
            condition: raw.condition,
            last_updated_epoch: raw.last_updated_epoch,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative, e.g. "//cdn.weatherapi.com/weather/64x64/day/113.png".
    pub icon: String,
}

impl WeatherModel {
    /// Decode a response body. Empty bodies, malformed JSON, missing fields
    /// and out-of-range readings are all rejected.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        if body.trim().is_empty() {
            return Err(DecodeError::EmptyBody);
        }

        Ok(serde_json::from_str(body)?)
    }

    /// "Name, Region, Country", skipping whichever parts are unknown.
    pub fn location_label(&self) -> String {
        let location = &self.location;
        [Some(&location.name), location.region.as_ref(), location.country.as_ref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Current {
    /// When the provider last refreshed this observation.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_epoch.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}

impl Condition {
    /// Absolute `https:` URL for the condition icon.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }

    /// Same icon at 128x128 instead of the default 64x64.
    pub fn icon_url_large(&self) -> String {
        self.icon_url().replace("64x64", "128x128")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Trimmed-down real response for London, with fields we don't model.
    pub const LONDON: &str = r#"{
        "location": {
            "name": "London",
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "lat": 51.52,
            "lon": -0.11,
            "tz_id": "Europe/London",
            "localtime_epoch": 1714570200,
            "localtime": "2024-05-01 14:30"
        },
        "current": {
            "last_updated_epoch": 1714569300,
            "last_updated": "2024-05-01 14:15",
            "temp_c": 23.5,
            "temp_f": 74.3,
            "is_day": 1,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_mph": 8.1,
            "wind_kph": 13.0,
            "wind_degree": 240,
            "wind_dir": "WSW",
            "pressure_mb": 1014.0,
            "pressure_in": 29.94,
            "precip_mm": 0.1,
            "precip_in": 0.0,
            "humidity": 57,
            "cloud": 50,
            "feelslike_c": 24.1,
            "feelslike_f": 75.4,
            "uv": 5.0
        }
    }"#;

    pub const MINIMAL_PARIS: &str = r#"{
        "location": { "name": "Paris" },
        "current": {
            "temp_c": 18.0,
            "feelslike_c": 17.2,
            "precip_mm": 0.0,
            "humidity": 72,
            "wind_kph": 9.4,
            "wind_dir": "N",
            "pressure_mb": 1021.0,
            "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png" }
        }
    }"#;
}
