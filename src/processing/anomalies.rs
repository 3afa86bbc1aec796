//! Rolling-window anomaly detection for weather and traffic series

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnomalyConfig;
use crate::models::{TrafficField, TrafficRecord, WeatherField, WeatherRecord};
use crate::stats;

/// Weather fields compared against their rolling average
pub const WEATHER_ANOMALY_FIELDS: [WeatherField; 4] = [
    WeatherField::MaxTemp,
    WeatherField::MinTemp,
    WeatherField::Precipitation,
    WeatherField::WindSpeed,
];

/// Deviation of one reading from the trailing average that ends on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAnomaly {
    pub date: NaiveDate,
    pub value: f64,
    pub rolling_average: f64,
    pub anomaly: f64,
}

/// Anomalies per weather field. Fields with no full window are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherAnomalies(BTreeMap<WeatherField, Vec<WeatherAnomaly>>);

impl WeatherAnomalies {
    #[must_use]
    pub fn get(&self, field: WeatherField) -> &[WeatherAnomaly] {
        self.0.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeatherField, &[WeatherAnomaly])> {
        self.0.iter().map(|(field, rows)| (*field, rows.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyDirection {
    High,
    Low,
}

/// A day whose traffic volume left the rolling mean ± sigma band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficAnomaly {
    pub date: NaiveDate,
    pub traffic_volume: f64,
    pub expected_volume: f64,
    pub anomaly_type: AnomalyDirection,
}

/// Compare each reading with the trailing `window`-record mean ending on
/// it. Records before the first full window get no anomaly.
#[tracing::instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn weather_anomalies(records: &[WeatherRecord], window: usize) -> WeatherAnomalies {
    let mut anomalies = BTreeMap::new();

    for field in WEATHER_ANOMALY_FIELDS {
        let values: Vec<Option<f64>> = records.iter().map(|r| r.value(field)).collect();
        if values.iter().all(Option::is_none) {
            continue;
        }

        let averages = stats::rolling_mean(&values, window);
        let rows: Vec<WeatherAnomaly> = records
            .iter()
            .zip(values.iter().zip(&averages))
            .filter_map(|(record, (value, average))| {
                let (value, rolling_average) = ((*value)?, (*average)?);
                Some(WeatherAnomaly {
                    date: record.date,
                    value,
                    rolling_average,
                    anomaly: value - rolling_average,
                })
            })
            .collect();

        if !rows.is_empty() {
            anomalies.insert(field, rows);
        }
    }

    WeatherAnomalies(anomalies)
}

/// Flag days whose volume lies strictly outside the trailing mean ± sigma
/// times the trailing sample standard deviation.
///
/// The series is ordered by date (stable) before the windows are taken;
/// missing volumes leave a hole that no window spans.
#[tracing::instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn traffic_anomalies(records: &[TrafficRecord], config: &AnomalyConfig) -> Vec<TrafficAnomaly> {
    let mut ordered: Vec<&TrafficRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let volumes: Vec<Option<f64>> = ordered
        .iter()
        .map(|r| r.value(TrafficField::TrafficVolume))
        .collect();
    let means = stats::rolling_mean(&volumes, config.traffic_window);
    let stds = stats::rolling_std(&volumes, config.traffic_window);

    let anomalies: Vec<TrafficAnomaly> = ordered
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let (volume, mean, std) = (volumes[i]?, means[i]?, stds[i]?);
            let band = config.traffic_sigma * std;
            if volume <= mean + band && volume >= mean - band {
                return None;
            }
            Some(TrafficAnomaly {
                date: record.date,
                traffic_volume: volume,
                expected_volume: mean,
                anomaly_type: if volume > mean {
                    AnomalyDirection::High
                } else {
                    AnomalyDirection::Low
                },
            })
        })
        .collect();

    debug!(count = anomalies.len(), "Detected traffic anomalies");
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn weather(max_temps: &[f64]) -> Vec<WeatherRecord> {
        max_temps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut r = WeatherRecord::new(start() + Days::new(i as u64));
                r.index = i;
                r.max_temp = Some(*t);
                r
            })
            .collect()
    }

    #[test]
    fn test_weather_anomalies_use_full_windows() {
        let records = weather(&[10.0, 20.0, 30.0, 40.0]);
        let anomalies = weather_anomalies(&records, 3);

        let max = anomalies.get(WeatherField::MaxTemp);
        assert_eq!(max.len(), 2);
        assert_eq!(max[0].date, records[2].date);
        assert_eq!(max[0].rolling_average, 20.0);
        assert_eq!(max[0].anomaly, 10.0);
        assert_eq!(max[1].rolling_average, 30.0);

        assert!(anomalies.get(WeatherField::Precipitation).is_empty());
    }

    #[test]
    fn test_weather_anomalies_short_series() {
        let anomalies = weather_anomalies(&weather(&[10.0, 20.0]), 30);
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_traffic_anomalies_flag_spikes() {
        let mut volumes = vec![100_000.0, 101_000.0, 99_000.0, 100_500.0, 99_500.0, 100_000.0];
        volumes.push(200_000.0);
        volumes.extend([100_000.0, 100_200.0, 99_800.0, 100_100.0, 99_900.0, 100_000.0]);
        volumes.push(10_000.0);

        // Supply out of order; detection sorts by date
        let records: Vec<TrafficRecord> = volumes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, v)| TrafficRecord::new(start() + Days::new(i as u64), *v))
            .collect();

        let anomalies = traffic_anomalies(&records, &AnomalyConfig::default());

        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].date, start() + Days::new(6));
        assert_eq!(anomalies[0].anomaly_type, AnomalyDirection::High);
        assert_eq!(anomalies[1].traffic_volume, 10_000.0);
        assert_eq!(anomalies[1].anomaly_type, AnomalyDirection::Low);
        assert!(anomalies[1].expected_volume > 10_000.0);
    }

    #[test]
    fn test_traffic_anomalies_flat_series() {
        let records: Vec<TrafficRecord> = (0..20)
            .map(|i| TrafficRecord::new(start() + Days::new(i), 80_000.0))
            .collect();
        assert!(traffic_anomalies(&records, &AnomalyConfig::default()).is_empty());
    }
}
