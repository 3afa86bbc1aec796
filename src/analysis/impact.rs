//! Impact Analyzer: mean traffic on extreme-condition days against the
//! remaining aligned days.

use std::collections::BTreeMap;

use tracing::debug;

use super::alignment::{align, paired_values};
use crate::config::ThresholdConfig;
use crate::models::{ImpactResult, TrafficField, TrafficRecord, WeatherCondition, WeatherRecord};
use crate::stats;

#[derive(Debug, Clone, Default)]
pub struct ImpactAnalyzer {
    thresholds: ThresholdConfig,
}

impl ImpactAnalyzer {
    #[must_use]
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    /// Threshold a condition's weather value must exceed
    #[must_use]
    pub fn threshold(&self, condition: WeatherCondition) -> f64 {
        match condition {
            WeatherCondition::Heatwave => self.thresholds.heatwave_temp_f,
            WeatherCondition::HeavyRain => self.thresholds.heavy_rain_in,
            WeatherCondition::Snowstorm => self.thresholds.snowstorm_in,
            WeatherCondition::HighWind => self.thresholds.high_wind_mph,
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(weather = weather.len(), traffic = traffic.len())
    )]
    pub fn analyze(
        &self,
        weather: &[WeatherRecord],
        traffic: &[TrafficRecord],
    ) -> BTreeMap<WeatherCondition, ImpactResult> {
        let rows = align(weather, traffic);
        let mut results = BTreeMap::new();

        for condition in WeatherCondition::ALL {
            let threshold = self.threshold(condition);
            let (values, volumes) =
                paired_values(&rows, condition.field(), TrafficField::TrafficVolume);

            let (extreme, normal): (Vec<(f64, f64)>, Vec<(f64, f64)>) = values
                .into_iter()
                .zip(volumes)
                .partition(|(value, _)| *value > threshold);
            let extreme: Vec<f64> = extreme.into_iter().map(|(_, volume)| volume).collect();
            let normal: Vec<f64> = normal.into_iter().map(|(_, volume)| volume).collect();

            let (Some(avg_traffic_extreme), Some(avg_traffic_normal)) =
                (stats::mean(&extreme), stats::mean(&normal))
            else {
                continue;
            };
            if avg_traffic_normal == 0.0 {
                debug!(%condition, "Normal-day traffic averages zero, skipping");
                continue;
            }

            let relative_change_pct =
                (avg_traffic_normal - avg_traffic_extreme) / avg_traffic_normal * 100.0;
            debug!(
                %condition,
                relative_change_pct,
                extreme_days = extreme.len(),
                "Computed impact"
            );

            results.insert(
                condition,
                ImpactResult {
                    avg_traffic_extreme,
                    avg_traffic_normal,
                    relative_change_pct,
                    extreme_day_count: extreme.len(),
                    normal_day_count: normal.len(),
                },
            );
        }

        results
    }
}

/// Analyze extreme-weather traffic impact with the default thresholds
#[must_use]
pub fn analyze_impact(
    weather: &[WeatherRecord],
    traffic: &[TrafficRecord],
) -> BTreeMap<WeatherCondition, ImpactResult> {
    ImpactAnalyzer::default().analyze(weather, traffic)
}
