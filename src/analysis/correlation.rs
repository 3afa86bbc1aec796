//! Correlation Engine
//!
//! Pearson correlation between the fixed weather/traffic variable pairs
//! over date-aligned rows, with a two-tailed Student's t p-value.

use std::collections::BTreeMap;

use tracing::debug;

use super::alignment::{align, paired_values};
use crate::config::CorrelationConfig;
use crate::models::{
    CorrelationPair, CorrelationResult, CorrelationStrength, TrafficRecord, WeatherRecord,
};
use crate::stats;

/// Correlation analysis with configurable strength cut-offs
#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    config: CorrelationConfig,
}

impl CorrelationEngine {
    #[must_use]
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Correlate every pair with at least two paired observations
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(weather = weather.len(), traffic = traffic.len())
    )]
    pub fn correlate(
        &self,
        weather: &[WeatherRecord],
        traffic: &[TrafficRecord],
    ) -> BTreeMap<CorrelationPair, CorrelationResult> {
        let rows = align(weather, traffic);
        let mut results = BTreeMap::new();
        if rows.is_empty() {
            debug!("No overlapping dates between weather and traffic");
            return results;
        }

        for pair in CorrelationPair::ALL {
            let (weather_field, traffic_field) = pair.fields();
            let (x, y) = paired_values(&rows, weather_field, traffic_field);
            if x.len() < 2 {
                continue;
            }

            let (correlation, p_value) = correlation_with_p_value(&x, &y);
            debug!(%pair, correlation, p_value, n = x.len(), "Computed correlation");
            results.insert(
                pair,
                CorrelationResult {
                    correlation,
                    strength: self.strength(correlation),
                    p_value,
                    sample_size: x.len(),
                },
            );
        }

        results
    }

    /// Bucket |r| with this engine's cut-offs
    #[must_use]
    pub fn strength(&self, correlation: f64) -> CorrelationStrength {
        let magnitude = correlation.abs();
        if magnitude >= self.config.strong {
            CorrelationStrength::Strong
        } else if magnitude >= self.config.moderate {
            CorrelationStrength::Moderate
        } else if magnitude >= self.config.weak {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::Negligible
        }
    }
}

/// Correlate weather and traffic with the default cut-offs
#[must_use]
pub fn correlate(
    weather: &[WeatherRecord],
    traffic: &[TrafficRecord],
) -> BTreeMap<CorrelationPair, CorrelationResult> {
    CorrelationEngine::default().correlate(weather, traffic)
}

/// Bucket |r| with the default cut-offs (0.7 / 0.5 / 0.3)
#[must_use]
pub fn correlation_strength(correlation: f64) -> CorrelationStrength {
    CorrelationEngine::default().strength(correlation)
}

/// Pearson r and its two-tailed p-value. Degenerate input (fewer than two
/// pairs, zero variance) gives `(0.0, 1.0)`.
#[must_use]
pub fn correlation_with_p_value(x: &[f64], y: &[f64]) -> (f64, f64) {
    if x.len() < 2 || x.len() != y.len() {
        return (0.0, 1.0);
    }
    let r = stats::pearson_correlation(x, y);
    if r == 0.0 {
        return (0.0, 1.0);
    }
    (r, stats::correlation_p_value(r, x.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherField;
    use chrono::{Days, NaiveDate};
    use rstest::rstest;

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 1).unwrap() + Days::new(i as u64)
    }

    fn weather_with(field: WeatherField, values: &[f64]) -> Vec<WeatherRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut r = WeatherRecord::new(date(i));
                r.index = i;
                match field {
                    WeatherField::MaxTemp => r.max_temp = Some(*v),
                    WeatherField::Precipitation => r.precipitation = Some(*v),
                    _ => unreachable!("unused in these tests"),
                }
                r
            })
            .collect()
    }

    #[rstest]
    #[case(0.7, CorrelationStrength::Strong)]
    #[case(-0.95, CorrelationStrength::Strong)]
    #[case(0.69, CorrelationStrength::Moderate)]
    #[case(0.5, CorrelationStrength::Moderate)]
    #[case(-0.3, CorrelationStrength::Weak)]
    #[case(0.29, CorrelationStrength::Negligible)]
    #[case(0.0, CorrelationStrength::Negligible)]
    fn test_strength_buckets(#[case] r: f64, #[case] expected: CorrelationStrength) {
        assert_eq!(correlation_strength(r), expected);
    }

    #[test]
    fn test_perfect_negative_linear_relation() {
        let temps: Vec<f64> = (0..20).map(|i| 50.0 + i as f64 * 2.0).collect();
        let weather = weather_with(WeatherField::MaxTemp, &temps);
        let traffic: Vec<TrafficRecord> = temps
            .iter()
            .enumerate()
            .map(|(i, t)| TrafficRecord::new(date(i), 1000.0 - 10.0 * t))
            .collect();

        let results = correlate(&weather, &traffic);
        let result = &results[&CorrelationPair::TemperatureTraffic];

        assert!((result.correlation + 1.0).abs() < 1e-9);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.strength, CorrelationStrength::Strong);
        assert_eq!(result.sample_size, 20);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_missing_fields_omit_pairs() {
        let weather = weather_with(WeatherField::MaxTemp, &[60.0, 70.0, 80.0]);
        let traffic: Vec<TrafficRecord> = (0..3)
            .map(|i| TrafficRecord::new(date(i), 1000.0 + i as f64 * 7.0))
            .collect();

        let results = correlate(&weather, &traffic);
        let pairs: Vec<CorrelationPair> = results.keys().copied().collect();
        assert_eq!(pairs, vec![CorrelationPair::TemperatureTraffic]);
    }

    #[test]
    fn test_single_overlap_is_omitted() {
        let weather = weather_with(WeatherField::MaxTemp, &[60.0, 70.0]);
        let traffic = vec![TrafficRecord::new(date(1), 1000.0)];
        assert!(correlate(&weather, &traffic).is_empty());
    }

    #[test]
    fn test_constant_series_is_neutral() {
        let weather = weather_with(WeatherField::Precipitation, &[0.0; 5]);
        let traffic: Vec<TrafficRecord> = (0..5)
            .map(|i| TrafficRecord::new(date(i), 900.0 + i as f64))
            .collect();

        let results = correlate(&weather, &traffic);
        let result = &results[&CorrelationPair::PrecipitationTraffic];
        assert_eq!(result.correlation, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.strength, CorrelationStrength::Negligible);
    }

    #[test]
    fn test_correlation_is_symmetric() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        let y = [3.0, 9.0, 1.0, 12.0, 6.0, 10.0];
        let (r_xy, p_xy) = correlation_with_p_value(&x, &y);
        let (r_yx, p_yx) = correlation_with_p_value(&y, &x);
        assert!((r_xy - r_yx).abs() < 1e-12);
        assert!((p_xy - p_yx).abs() < 1e-12);
    }

    #[test]
    fn test_empty_weather() {
        let traffic = vec![TrafficRecord::new(date(0), 1000.0)];
        assert!(correlate(&[], &traffic).is_empty());
    }

    #[test]
    fn test_custom_cut_offs() {
        let engine = CorrelationEngine::new(CorrelationConfig {
            strong: 0.9,
            ..CorrelationConfig::default()
        });
        assert_eq!(engine.strength(0.8), CorrelationStrength::Moderate);
    }
}
