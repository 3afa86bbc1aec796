//! Daily traffic observation model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic measurements for one calendar date (optionally one city)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrafficRecord {
    /// Observation date
    pub date: NaiveDate,
    /// City the counts belong to, when the source covers several
    #[serde(default)]
    pub city: Option<String>,
    /// Vehicle count for the day
    #[serde(default)]
    pub traffic_volume: Option<f64>,
    /// Average travel speed in mph
    #[serde(default)]
    pub avg_speed: Option<f64>,
    /// Congestion bucket reported by the source
    #[serde(default)]
    pub congestion_level: Option<CongestionLevel>,
}

impl TrafficRecord {
    /// Create a record with a traffic volume only
    #[must_use]
    pub fn new(date: NaiveDate, traffic_volume: f64) -> Self {
        Self {
            date,
            city: None,
            traffic_volume: Some(traffic_volume),
            avg_speed: None,
            congestion_level: None,
        }
    }

    /// Read one measurement, treating NaN as missing
    #[must_use]
    pub fn value(&self, field: TrafficField) -> Option<f64> {
        let value = match field {
            TrafficField::TrafficVolume => self.traffic_volume,
            TrafficField::AvgSpeed => self.avg_speed,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// Numeric traffic measurements a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficField {
    TrafficVolume,
    AvgSpeed,
}

impl TrafficField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrafficField::TrafficVolume => "traffic_volume",
            TrafficField::AvgSpeed => "avg_speed",
        }
    }
}

impl fmt::Display for TrafficField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Congestion buckets; informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}
