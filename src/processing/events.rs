//! Extreme Event Detector
//!
//! Scans a cleaned weather series for:
//!
//! - **Run events** (heatwaves, cold spells, droughts) are maximal runs of
//!   consecutive records satisfying a predicate, kept when the run reaches
//!   the category's minimum length. Continuity is positional: a gap in the
//!   dates does not break a run, a record failing the predicate does.
//! - **Point events** (heavy rainfall, snowstorms, high wind) give one
//!   event per qualifying record.
//!
//! Categories are evaluated independently, so one day can appear in
//! several of them.

use tracing::debug;

use crate::config::ThresholdConfig;
use crate::models::{
    DetectedEvents, EventCategory, ExtremeEvent, PointEvent, RunEvent, Severity, WeatherField,
    WeatherRecord,
};

/// Detects extreme weather events with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct ExtremeEventDetector {
    thresholds: ThresholdConfig,
}

impl ExtremeEventDetector {
    #[must_use]
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Detect every category over a cleaned, date-ordered series
    #[tracing::instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn detect(&self, records: &[WeatherRecord]) -> DetectedEvents {
        let mut events = DetectedEvents::empty();

        for category in EventCategory::ALL {
            let detected = self.detect_category(records, category);
            if !detected.is_empty() {
                debug!(%category, count = detected.len(), "Detected extreme events");
            }
            events.insert(category, detected);
        }

        events
    }

    /// Detect a single category
    #[must_use]
    pub fn detect_category(
        &self,
        records: &[WeatherRecord],
        category: EventCategory,
    ) -> Vec<ExtremeEvent> {
        let t = &self.thresholds;
        let field = category.field();

        match category {
            EventCategory::Heatwave => {
                let limit = t.heatwave_temp_f;
                detect_runs(records, field, |v| v > limit, t.heatwave_min_days)
            }
            EventCategory::ColdSpell => {
                let limit = t.cold_spell_temp_f;
                detect_runs(records, field, |v| v < limit, t.cold_spell_min_days)
            }
            EventCategory::Drought => {
                detect_runs(records, field, |v| v == 0.0, t.drought_min_days)
            }
            EventCategory::HeavyRainfall => {
                let limit = t.heavy_rain_in;
                detect_points(records, field, |v| (v > limit).then_some(Severity::Heavy))
            }
            EventCategory::Snowstorm => {
                let limit = t.snowstorm_in;
                detect_points(records, field, |v| (v > limit).then_some(Severity::Storm))
            }
            EventCategory::HighWind => {
                let (high, extreme) = (t.high_wind_mph, t.extreme_wind_mph);
                detect_points(records, field, |v| {
                    if v <= high {
                        None
                    } else if v >= extreme {
                        Some(Severity::Extreme)
                    } else {
                        Some(Severity::High)
                    }
                })
            }
        }
    }
}

/// Detect extreme events with the default thresholds
#[must_use]
pub fn detect(records: &[WeatherRecord]) -> DetectedEvents {
    ExtremeEventDetector::default().detect(records)
}

/// Emit one run event for every maximal run of records satisfying
/// `predicate` that is at least `min_len` records long.
///
/// A missing value never satisfies the predicate.
fn detect_runs(
    records: &[WeatherRecord],
    field: WeatherField,
    predicate: impl Fn(f64) -> bool,
    min_len: usize,
) -> Vec<ExtremeEvent> {
    let mask: Vec<bool> = records
        .iter()
        .map(|record| record.value(field).is_some_and(&predicate))
        .collect();

    let mut events = Vec::new();
    let mut start = 0;
    while start < mask.len() {
        let len = mask[start..].iter().take_while(|m| **m == mask[start]).count();
        if mask[start] && len >= min_len.max(1) {
            events.push(ExtremeEvent::Run(summarize_run(&records[start..start + len], field)));
        }
        start += len;
    }
    events
}

fn summarize_run(run: &[WeatherRecord], field: WeatherField) -> RunEvent {
    // Every record of a qualifying run carries a value
    let values: Vec<f64> = run.iter().filter_map(|r| r.value(field)).collect();

    RunEvent {
        start_date: run[0].date,
        end_date: run[run.len() - 1].date,
        duration: run.len(),
        max_value: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_value: values.iter().copied().fold(f64::INFINITY, f64::min),
        avg_value: values.iter().sum::<f64>() / values.len() as f64,
    }
}

fn detect_points(
    records: &[WeatherRecord],
    field: WeatherField,
    classify: impl Fn(f64) -> Option<Severity>,
) -> Vec<ExtremeEvent> {
    records
        .iter()
        .filter_map(|record| {
            let value = record.value(field)?;
            let severity = classify(value)?;
            Some(ExtremeEvent::Point(PointEvent {
                date: record.date,
                value,
                severity,
            }))
        })
        .collect()
}
