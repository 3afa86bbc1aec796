//! Daily weather observation models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather observation as delivered by a data source, before cleaning.
///
/// Every field is optional. The date is kept as text so that the cleaner
/// decides what is parseable; NOAA GHCN column names are accepted as
/// aliases so provider exports deserialize directly.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RawWeatherRecord {
    /// Observation date as text (e.g. `2023-07-14`)
    #[serde(default)]
    pub date: Option<String>,
    /// Daily maximum temperature in °F
    #[serde(default, alias = "TMAX")]
    pub max_temp: Option<f64>,
    /// Daily minimum temperature in °F
    #[serde(default, alias = "TMIN")]
    pub min_temp: Option<f64>,
    /// Daily average temperature in °F
    #[serde(default, alias = "TAVG")]
    pub avg_temp: Option<f64>,
    /// Precipitation in inches
    #[serde(default, alias = "PRCP")]
    pub precipitation: Option<f64>,
    /// Average wind speed in mph
    #[serde(default, alias = "AWND")]
    pub wind_speed: Option<f64>,
    /// Snowfall in inches
    #[serde(default, alias = "SNOW")]
    pub snowfall: Option<f64>,
}

impl RawWeatherRecord {
    /// Create a raw record with only a date set
    #[must_use]
    pub fn dated(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }
}

/// Cleaned weather observation: one per calendar date, ascending.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherRecord {
    /// 0-based position within the cleaned series
    pub index: usize,
    /// Observation date (unique within a series)
    pub date: NaiveDate,
    /// Daily maximum temperature in °F
    pub max_temp: Option<f64>,
    /// Daily minimum temperature in °F
    pub min_temp: Option<f64>,
    /// Daily average temperature in °F
    pub avg_temp: Option<f64>,
    /// Precipitation in inches
    pub precipitation: Option<f64>,
    /// Average wind speed in mph
    pub wind_speed: Option<f64>,
    /// Snowfall in inches
    pub snowfall: Option<f64>,
}

impl WeatherRecord {
    /// Create a record for `date` with no measurements
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            index: 0,
            date,
            max_temp: None,
            min_temp: None,
            avg_temp: None,
            precipitation: None,
            wind_speed: None,
            snowfall: None,
        }
    }

    /// Read one measurement, treating NaN as missing
    #[must_use]
    pub fn value(&self, field: WeatherField) -> Option<f64> {
        let value = match field {
            WeatherField::MaxTemp => self.max_temp,
            WeatherField::MinTemp => self.min_temp,
            WeatherField::AvgTemp => self.avg_temp,
            WeatherField::Precipitation => self.precipitation,
            WeatherField::WindSpeed => self.wind_speed,
            WeatherField::Snowfall => self.snowfall,
        };
        value.filter(|v| !v.is_nan())
    }
}

impl From<&WeatherRecord> for RawWeatherRecord {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            date: Some(record.date.format("%Y-%m-%d").to_string()),
            max_temp: record.max_temp,
            min_temp: record.min_temp,
            avg_temp: record.avg_temp,
            precipitation: record.precipitation,
            wind_speed: record.wind_speed,
            snowfall: record.snowfall,
        }
    }
}

/// Numeric weather measurements a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherField {
    MaxTemp,
    MinTemp,
    AvgTemp,
    Precipitation,
    WindSpeed,
    Snowfall,
}

impl WeatherField {
    /// Temperature fields subject to percentile outlier trimming, in trim order
    pub const TEMPERATURES: [WeatherField; 3] =
        [WeatherField::MaxTemp, WeatherField::MinTemp, WeatherField::AvgTemp];

    /// Fields whose negative readings invalidate the whole record
    pub const NON_NEGATIVE: [WeatherField; 2] =
        [WeatherField::Precipitation, WeatherField::WindSpeed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeatherField::MaxTemp => "max_temp",
            WeatherField::MinTemp => "min_temp",
            WeatherField::AvgTemp => "avg_temp",
            WeatherField::Precipitation => "precipitation",
            WeatherField::WindSpeed => "wind_speed",
            WeatherField::Snowfall => "snowfall",
        }
    }

    /// Unit the field is measured in
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            WeatherField::MaxTemp | WeatherField::MinTemp | WeatherField::AvgTemp => "°F",
            WeatherField::Precipitation | WeatherField::Snowfall => "in",
            WeatherField::WindSpeed => "mph",
        }
    }
}

impl fmt::Display for WeatherField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
