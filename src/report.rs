//! End-to-end analysis of a raw weather series against traffic counts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{CorrelationEngine, ImpactAnalyzer, TrafficModel, fit_traffic_model};
use crate::config::InsightsConfig;
use crate::models::{
    CorrelationPair, CorrelationResult, DetectedEvents, EventShape, ExtremeEvent, ImpactResult,
    RawWeatherRecord, TrafficRecord, WeatherCondition,
};
use crate::processing::{
    ExtremeEventDetector, TrafficAnomaly, WeatherAnomalies, WeatherStatistics,
    calculate_statistics, clean, traffic_anomalies, weather_anomalies,
};

/// Everything the pipeline derives from one weather and one traffic series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub raw_weather_records: usize,
    pub cleaned_weather_records: usize,
    pub traffic_records: usize,
    pub statistics: WeatherStatistics,
    pub events: DetectedEvents,
    pub correlations: BTreeMap<CorrelationPair, CorrelationResult>,
    pub impact: BTreeMap<WeatherCondition, ImpactResult>,
    pub weather_anomalies: WeatherAnomalies,
    pub traffic_anomalies: Vec<TrafficAnomaly>,
    pub prediction: Option<TrafficModel>,
}

impl AnalysisReport {
    /// Correlation summary using the given significance level
    #[must_use]
    pub fn correlation_summary(&self, significance_level: f64) -> String {
        format_correlation_results(&self.correlations, significance_level)
    }

    /// Event listing followed by the correlation summary
    #[must_use]
    pub fn summary(&self, significance_level: f64) -> String {
        format!(
            "{}\n\n{}",
            format_event_summary(&self.events),
            self.correlation_summary(significance_level)
        )
    }
}

/// Runs the whole pipeline with one configuration
#[derive(Debug, Clone, Default)]
pub struct WeatherTrafficAnalyzer {
    config: InsightsConfig,
}

impl WeatherTrafficAnalyzer {
    #[must_use]
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Clean `weather`, then detect, summarize, correlate and fit against
    /// `traffic`
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(weather = weather.len(), traffic = traffic.len())
    )]
    pub fn analyze(
        &self,
        weather: &[RawWeatherRecord],
        traffic: &[TrafficRecord],
    ) -> AnalysisReport {
        let cleaned = clean(weather);
        let thresholds = &self.config.thresholds;

        let events = ExtremeEventDetector::new(thresholds.clone()).detect(&cleaned);
        let correlations =
            CorrelationEngine::new(self.config.correlation.clone()).correlate(&cleaned, traffic);
        let impact = ImpactAnalyzer::new(thresholds.clone()).analyze(&cleaned, traffic);
        let prediction = fit_traffic_model(
            &cleaned,
            traffic,
            self.config.correlation.min_regression_samples,
        );

        let report = AnalysisReport {
            raw_weather_records: weather.len(),
            cleaned_weather_records: cleaned.len(),
            traffic_records: traffic.len(),
            statistics: calculate_statistics(&cleaned, thresholds),
            weather_anomalies: weather_anomalies(&cleaned, self.config.anomalies.weather_window),
            traffic_anomalies: traffic_anomalies(traffic, &self.config.anomalies),
            events,
            correlations,
            impact,
            prediction,
        };

        info!(
            cleaned = report.cleaned_weather_records,
            events = report.events.total(),
            correlations = report.correlations.len(),
            impacts = report.impact.len(),
            "Analysis complete"
        );
        report
    }
}

/// Run the full pipeline with the default configuration
#[must_use]
pub fn analyze_all(weather: &[RawWeatherRecord], traffic: &[TrafficRecord]) -> AnalysisReport {
    WeatherTrafficAnalyzer::default().analyze(weather, traffic)
}

/// One markdown line per pair, e.g.
/// `**Temperature Traffic**: -0.412 (weak, significant)`
#[must_use]
pub fn format_correlation_results(
    correlations: &BTreeMap<CorrelationPair, CorrelationResult>,
    significance_level: f64,
) -> String {
    if correlations.is_empty() {
        return "No correlation data available.".to_string();
    }

    correlations
        .iter()
        .map(|(pair, result)| {
            let significance = if result.is_significant(significance_level) {
                "significant"
            } else {
                "not significant"
            };
            format!(
                "**{}**: {:.3} ({}, {significance})",
                pair.title(),
                result.correlation,
                result.strength
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per detected event, grouped by category in chronological order
#[must_use]
pub fn format_event_summary(events: &DetectedEvents) -> String {
    if events.is_empty() {
        return "No extreme weather events detected.".to_string();
    }

    let mut lines = Vec::new();
    for (category, detected) in events.iter() {
        if detected.is_empty() {
            continue;
        }
        let unit = category.field().unit();
        let noun = match category.shape() {
            EventShape::Run => "run",
            EventShape::Point => "day",
        };
        lines.push(format!("**{category}**: {} {noun}(s)", detected.len()));

        for event in detected {
            let line = match event {
                ExtremeEvent::Run(run) => format!(
                    "- {} to {} ({} days, {:.1} to {:.1}{unit})",
                    run.start_date, run.end_date, run.duration, run.min_value, run.max_value
                ),
                ExtremeEvent::Point(point) => format!(
                    "- {}: {:.1}{unit} ({})",
                    event.start_date(),
                    point.value,
                    point.severity
                ),
            };
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrelationStrength;

    #[test]
    fn test_format_empty() {
        assert_eq!(
            format_correlation_results(&BTreeMap::new(), 0.05),
            "No correlation data available."
        );
    }

    #[test]
    fn test_format_lines() {
        let mut correlations = BTreeMap::new();
        correlations.insert(
            CorrelationPair::TemperatureTraffic,
            CorrelationResult {
                correlation: -0.41234,
                strength: CorrelationStrength::Weak,
                p_value: 0.01,
                sample_size: 40,
            },
        );
        correlations.insert(
            CorrelationPair::PrecipitationSpeed,
            CorrelationResult {
                correlation: 0.1,
                strength: CorrelationStrength::Negligible,
                p_value: 0.05,
                sample_size: 40,
            },
        );

        let text = format_correlation_results(&correlations, 0.05);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "**Temperature Traffic**: -0.412 (weak, significant)");
        assert_eq!(lines[1], "**Precipitation Speed**: 0.100 (negligible, not significant)");
    }

    #[test]
    fn test_event_summary() {
        let weather: Vec<RawWeatherRecord> = (1..=4)
            .map(|day| RawWeatherRecord {
                max_temp: Some(95.0),
                wind_speed: Some(if day == 2 { 55.0 } else { 5.0 }),
                ..RawWeatherRecord::dated(format!("2023-07-0{day}"))
            })
            .collect();
        let report = analyze_all(&weather, &[]);
        let text = format_event_summary(&report.events);

        assert!(text.contains("**heatwave**: 1 run(s)"));
        assert!(text.contains("- 2023-07-01 to 2023-07-04 (4 days, 95.0 to 95.0°F)"));
        assert!(text.contains("**high_wind**: 1 day(s)"));
        assert!(text.contains("- 2023-07-02: 55.0mph (extreme)"));
        assert_eq!(
            format_event_summary(&DetectedEvents::empty()),
            "No extreme weather events detected."
        );
    }

    #[test]
    fn test_analyze_empty_inputs() {
        let report = analyze_all(&[], &[]);
        assert_eq!(report.cleaned_weather_records, 0);
        assert!(report.correlations.is_empty());
        assert!(report.impact.is_empty());
        assert!(report.prediction.is_none());
        assert_eq!(report.events.iter().count(), 6);
        assert_eq!(report.correlation_summary(0.05), "No correlation data available.");
    }
}
