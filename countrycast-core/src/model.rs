use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::LookupError;

/// Literal used wherever the country dataset has no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// A latitude or longitude that may be unknown.
///
/// Serialized either as a JSON number or as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Known(f64),
    NotAvailable,
}

impl Coordinate {
    /// Normalize a raw dataset value. Zero counts as missing, same as an absent value.
    pub fn from_raw(value: Option<f64>) -> Self {
        match value {
            Some(v) if v != 0.0 && v.is_finite() => Coordinate::Known(v),
            _ => Coordinate::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Known(v) => Some(*v),
            Coordinate::NotAvailable => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Known(v) => write!(f, "{v}"),
            Coordinate::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coordinate::Known(v) => serializer.serialize_f64(*v),
            Coordinate::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Coordinate::Known(v)),
            Repr::Text(s) if s == NOT_AVAILABLE => Ok(Coordinate::NotAvailable),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{NOT_AVAILABLE}\", got \"{s}\""
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or(&self.code);
        match &self.symbol {
            Some(symbol) => write!(f, "{name} ({symbol}) [{}]", self.code),
            None => write!(f, "{name} [{}]", self.code),
        }
    }
}

/// One normalized entry of the country dataset. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub flag_url: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub currencies: Vec<Currency>,
}

/// What the resolver hands to the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDetails {
    pub name: String,
    pub flag: String,
    pub lat: Coordinate,
    pub lon: Coordinate,
    pub currencies: Vec<Currency>,
}

impl CountryDetails {
    /// Both coordinates, or `None` when either one is unknown.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.value()?, self.lon.value()?))
    }
}

impl From<&CountryRecord> for CountryDetails {
    fn from(record: &CountryRecord) -> Self {
        Self {
            name: record.name.clone(),
            flag: record.flag_url.clone(),
            lat: record.latitude,
            lon: record.longitude,
            currencies: record.currencies.clone(),
        }
    }
}

/// Daily forecast with index-aligned sequences; index 0 is the first returned day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherForecast {
    dates: Vec<NaiveDate>,
    daily_max: Vec<f64>,
    daily_min: Vec<f64>,
    weather_codes: Vec<u8>,
}

impl WeatherForecast {
    /// Build a forecast, rejecting sequences of different lengths.
    pub fn new(
        dates: Vec<NaiveDate>,
        daily_max: Vec<f64>,
        daily_min: Vec<f64>,
        weather_codes: Vec<u8>,
    ) -> Result<Self, LookupError> {
        let len = dates.len();
        if daily_max.len() != len || daily_min.len() != len || weather_codes.len() != len {
            return Err(LookupError::MalformedForecast(format!(
                "daily sequences differ in length: time={}, max={}, min={}, weathercode={}",
                len,
                daily_max.len(),
                daily_min.len(),
                weather_codes.len(),
            )));
        }

        Ok(Self {
            dates,
            daily_max,
            daily_min,
            weather_codes,
        })
    }

    pub fn len(&self) -> usize {
        self.daily_max.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_max.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn daily_max(&self) -> &[f64] {
        &self.daily_max
    }

    pub fn daily_min(&self) -> &[f64] {
        &self.daily_min
    }

    pub fn weather_codes(&self) -> &[u8] {
        &self.weather_codes
    }

    /// Maximum temperature of the first day, if any.
    pub fn first_day_max(&self) -> Option<f64> {
        self.daily_max.first().copied()
    }
}
