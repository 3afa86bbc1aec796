//! Extreme weather event models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::weather::WeatherField;

/// Kinds of extreme weather the detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Heatwave,
    ColdSpell,
    Drought,
    HeavyRainfall,
    Snowstorm,
    HighWind,
}

/// Whether a category describes sustained runs or single days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventShape {
    Run,
    Point,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Heatwave,
        EventCategory::ColdSpell,
        EventCategory::Drought,
        EventCategory::HeavyRainfall,
        EventCategory::Snowstorm,
        EventCategory::HighWind,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Heatwave => "heatwave",
            EventCategory::ColdSpell => "cold_spell",
            EventCategory::Drought => "drought",
            EventCategory::HeavyRainfall => "heavy_rainfall",
            EventCategory::Snowstorm => "snowstorm",
            EventCategory::HighWind => "high_wind",
        }
    }

    /// The measurement that triggers this category
    #[must_use]
    pub fn field(self) -> WeatherField {
        match self {
            EventCategory::Heatwave => WeatherField::MaxTemp,
            EventCategory::ColdSpell => WeatherField::MinTemp,
            EventCategory::Drought | EventCategory::HeavyRainfall => WeatherField::Precipitation,
            EventCategory::Snowstorm => WeatherField::Snowfall,
            EventCategory::HighWind => WeatherField::WindSpeed,
        }
    }

    #[must_use]
    pub fn shape(self) -> EventShape {
        match self {
            EventCategory::Heatwave | EventCategory::ColdSpell | EventCategory::Drought => {
                EventShape::Run
            }
            EventCategory::HeavyRainfall | EventCategory::Snowstorm | EventCategory::HighWind => {
                EventShape::Point
            }
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier attached to single-day events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Heavy rainfall day
    Heavy,
    /// Snowstorm day
    Storm,
    /// High wind day
    High,
    /// Wind at or above the extreme wind threshold
    Extreme,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Heavy => "heavy",
            Severity::Storm => "storm",
            Severity::High => "high",
            Severity::Extreme => "extreme",
        })
    }
}

/// A condition sustained over consecutive records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of records in the run
    pub duration: usize,
    pub max_value: f64,
    pub min_value: f64,
    pub avg_value: f64,
}

/// A condition evaluated on a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub date: NaiveDate,
    pub value: f64,
    pub severity: Severity,
}

/// One detected extreme weather occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ExtremeEvent {
    Run(RunEvent),
    Point(PointEvent),
}

impl ExtremeEvent {
    /// First date covered by the event
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        match self {
            ExtremeEvent::Run(run) => run.start_date,
            ExtremeEvent::Point(point) => point.date,
        }
    }

    #[must_use]
    pub fn as_run(&self) -> Option<&RunEvent> {
        match self {
            ExtremeEvent::Run(run) => Some(run),
            ExtremeEvent::Point(_) => None,
        }
    }

    #[must_use]
    pub fn as_point(&self) -> Option<&PointEvent> {
        match self {
            ExtremeEvent::Point(point) => Some(point),
            ExtremeEvent::Run(_) => None,
        }
    }
}

/// Detection output: every category is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectedEvents {
    events: BTreeMap<EventCategory, Vec<ExtremeEvent>>,
}

impl Default for DetectedEvents {
    fn default() -> Self {
        Self {
            events: EventCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }
}

impl DetectedEvents {
    /// Create an output with all categories empty
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, category: EventCategory, events: Vec<ExtremeEvent>) {
        self.events.insert(category, events);
    }

    /// Events of one category in chronological order
    #[must_use]
    pub fn get(&self, category: EventCategory) -> &[ExtremeEvent] {
        self.events.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Run events of a run-shaped category
    pub fn runs(&self, category: EventCategory) -> impl Iterator<Item = &RunEvent> {
        self.get(category).iter().filter_map(ExtremeEvent::as_run)
    }

    /// Point events of a point-shaped category
    pub fn points(&self, category: EventCategory) -> impl Iterator<Item = &PointEvent> {
        self.get(category).iter().filter_map(ExtremeEvent::as_point)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventCategory, &[ExtremeEvent])> {
        self.events
            .iter()
            .map(|(category, events)| (*category, events.as_slice()))
    }

    /// Total number of events across categories
    #[must_use]
    pub fn total(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_has_every_category() {
        let events = DetectedEvents::empty();
        for category in EventCategory::ALL {
            assert!(events.get(category).is_empty());
        }
        assert_eq!(events.iter().count(), 6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_category_shapes() {
        assert_eq!(EventCategory::Heatwave.shape(), EventShape::Run);
        assert_eq!(EventCategory::Drought.shape(), EventShape::Run);
        assert_eq!(EventCategory::HighWind.shape(), EventShape::Point);
        assert_eq!(EventCategory::Drought.field(), WeatherField::Precipitation);
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 3).unwrap();
        let event = ExtremeEvent::Point(PointEvent {
            date,
            value: 8.5,
            severity: Severity::Storm,
        });
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["shape"], "point");
        assert_eq!(json["severity"], "storm");
        assert_eq!(json["date"], "2023-02-03");
    }

    #[test]
    fn test_serialized_map_uses_category_names() {
        let json = serde_json::to_value(DetectedEvents::empty()).unwrap();
        let object = json.as_object().unwrap();

        assert!(object.contains_key("heatwave"));
        assert!(object.contains_key("cold_spell"));
        assert!(object.contains_key("high_wind"));
    }
}
