//! Summary statistics over a cleaned weather series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::models::{WeatherField, WeatherRecord};
use crate::stats;

/// Per-field summaries; a section is `None` when its field is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherStatistics {
    pub max_temperature: Option<MaxTemperatureStats>,
    pub min_temperature: Option<MinTemperatureStats>,
    pub precipitation: Option<PrecipitationStats>,
    pub wind: Option<WindStats>,
    pub snow: Option<SnowStats>,
    pub date_range: Option<DateRangeStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxTemperatureStats {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
    /// Sample standard deviation; `None` with a single reading
    pub std_dev: Option<f64>,
    pub range: f64,
    pub days_above_heatwave: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinTemperatureStats {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
    pub days_below_freezing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationStats {
    pub total: f64,
    pub max_daily: f64,
    pub average: f64,
    pub rainy_days: usize,
    pub heavy_rain_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindStats {
    pub max_speed: f64,
    pub average_speed: f64,
    pub high_wind_days: usize,
    pub extreme_wind_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowStats {
    pub total: f64,
    pub max_daily: f64,
    pub snowy_days: usize,
    pub snowstorm_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRangeStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: usize,
}

/// Summarize a cleaned series against the given thresholds
#[must_use]
pub fn calculate_statistics(
    records: &[WeatherRecord],
    thresholds: &ThresholdConfig,
) -> WeatherStatistics {
    let column = |field: WeatherField| -> Vec<f64> {
        records.iter().filter_map(|r| r.value(field)).collect()
    };
    let count_where = |values: &[f64], predicate: &dyn Fn(f64) -> bool| {
        values.iter().filter(|v| predicate(**v)).count()
    };

    let max_temps = column(WeatherField::MaxTemp);
    let max_temperature = summary(&max_temps).map(|s| MaxTemperatureStats {
        highest: s.max,
        lowest: s.min,
        average: s.mean,
        std_dev: stats::sample_std(&max_temps),
        range: s.max - s.min,
        days_above_heatwave: count_where(&max_temps, &|v| v > thresholds.heatwave_temp_f),
    });

    let min_temps = column(WeatherField::MinTemp);
    let min_temperature = summary(&min_temps).map(|s| MinTemperatureStats {
        highest: s.max,
        lowest: s.min,
        average: s.mean,
        days_below_freezing: count_where(&min_temps, &|v| v < thresholds.cold_spell_temp_f),
    });

    let precip = column(WeatherField::Precipitation);
    let precipitation = summary(&precip).map(|s| PrecipitationStats {
        total: s.sum,
        max_daily: s.max,
        average: s.mean,
        rainy_days: count_where(&precip, &|v| v > 0.0),
        heavy_rain_days: count_where(&precip, &|v| v > thresholds.heavy_rain_in),
    });

    let winds = column(WeatherField::WindSpeed);
    let wind = summary(&winds).map(|s| WindStats {
        max_speed: s.max,
        average_speed: s.mean,
        high_wind_days: count_where(&winds, &|v| v > thresholds.high_wind_mph),
        extreme_wind_days: count_where(&winds, &|v| v >= thresholds.extreme_wind_mph),
    });

    let snowfall = column(WeatherField::Snowfall);
    let snow = summary(&snowfall).map(|s| SnowStats {
        total: s.sum,
        max_daily: s.max,
        snowy_days: count_where(&snowfall, &|v| v > 0.0),
        snowstorm_days: count_where(&snowfall, &|v| v > thresholds.snowstorm_in),
    });

    let date_range = records
        .iter()
        .map(|r| r.date)
        .min()
        .zip(records.iter().map(|r| r.date).max())
        .map(|(start_date, end_date)| DateRangeStats {
            start_date,
            end_date,
            total_days: records.len(),
        });

    WeatherStatistics {
        max_temperature,
        min_temperature,
        precipitation,
        wind,
        snow,
        date_range,
    }
}

struct Summary {
    sum: f64,
    mean: f64,
    min: f64,
    max: f64,
}

fn summary(values: &[f64]) -> Option<Summary> {
    let mean = stats::mean(values)?;
    Some(Summary {
        sum: values.iter().sum(),
        mean,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn records() -> Vec<WeatherRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rows = [
            (92.0, 30.0, 0.0, 10.0),
            (88.0, 28.0, 2.5, 22.0),
            (95.0, 35.0, 0.4, 55.0),
            (70.0, 40.0, 0.0, 5.0),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, (max, min, prcp, wind))| {
                let mut r = WeatherRecord::new(start + Days::new(i as u64));
                r.index = i;
                r.max_temp = Some(*max);
                r.min_temp = Some(*min);
                r.precipitation = Some(*prcp);
                r.wind_speed = Some(*wind);
                r
            })
            .collect()
    }

    #[test]
    fn test_statistics_sections() {
        let stats = calculate_statistics(&records(), &ThresholdConfig::default());

        let max = stats.max_temperature.unwrap();
        assert_eq!(max.highest, 95.0);
        assert_eq!(max.lowest, 70.0);
        assert_eq!(max.range, 25.0);
        assert!((max.average - 86.25).abs() < 1e-12);
        assert_eq!(max.days_above_heatwave, 2);

        let min = stats.min_temperature.unwrap();
        assert_eq!(min.days_below_freezing, 2);

        let precip = stats.precipitation.unwrap();
        assert!((precip.total - 2.9).abs() < 1e-12);
        assert_eq!(precip.rainy_days, 2);
        assert_eq!(precip.heavy_rain_days, 1);

        let wind = stats.wind.unwrap();
        assert_eq!(wind.high_wind_days, 2);
        assert_eq!(wind.extreme_wind_days, 1);

        assert!(stats.snow.is_none());

        let range = stats.date_range.unwrap();
        assert_eq!(range.total_days, 4);
        assert_eq!(range.end_date.to_string(), "2023-01-04");
    }

    #[test]
    fn test_statistics_empty_series() {
        let stats = calculate_statistics(&[], &ThresholdConfig::default());
        assert_eq!(stats, WeatherStatistics::default());
    }
}
