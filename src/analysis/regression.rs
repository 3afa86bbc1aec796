//! Linear traffic prediction from daily weather

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::alignment::{AlignedDay, align};
use crate::models::{TrafficField, TrafficRecord, WeatherField, WeatherRecord};
use crate::stats;

/// Default minimum number of aligned rows for a fit
pub const MIN_SAMPLES: usize = 10;

/// Candidate features and how their gaps are filled
const FEATURES: [(WeatherField, Fill); 5] = [
    (WeatherField::MaxTemp, Fill::Mean),
    (WeatherField::MinTemp, Fill::Mean),
    (WeatherField::Precipitation, Fill::Zero),
    (WeatherField::WindSpeed, Fill::Mean),
    (WeatherField::Snowfall, Fill::Zero),
];

#[derive(Debug, Clone, Copy)]
enum Fill {
    Mean,
    Zero,
}

/// Ordinary least squares fit of traffic volume on weather features,
/// evaluated in-sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficModel {
    pub r2: f64,
    pub mse: f64,
    pub rmse: f64,
    pub coefficients: BTreeMap<WeatherField, f64>,
    pub intercept: f64,
    pub n_samples: usize,
}

impl TrafficModel {
    /// Predicted volume for one day. Missing readings contribute nothing.
    #[must_use]
    pub fn predict(&self, record: &WeatherRecord) -> f64 {
        self.coefficients
            .iter()
            .filter_map(|(field, coefficient)| Some(coefficient * record.value(*field)?))
            .sum::<f64>()
            + self.intercept
    }
}

/// Fit traffic volume against every weather feature with at least one
/// reading on the aligned days.
///
/// Returns `None` with fewer than `min_samples` aligned rows, when no
/// feature or volume is present, or when the features are collinear.
#[tracing::instrument(
    level = "debug",
    skip(weather, traffic),
    fields(weather = weather.len(), traffic = traffic.len())
)]
pub fn fit_traffic_model(
    weather: &[WeatherRecord],
    traffic: &[TrafficRecord],
    min_samples: usize,
) -> Option<TrafficModel> {
    let rows = align(weather, traffic);
    if rows.len() < min_samples.max(2) {
        debug!(rows = rows.len(), "Not enough aligned rows for a traffic model");
        return None;
    }

    let target = filled_column(
        &rows,
        |row| row.traffic.value(TrafficField::TrafficVolume),
        Fill::Mean,
    )?;
    let columns: Vec<(WeatherField, Vec<f64>)> = FEATURES
        .iter()
        .filter_map(|(field, fill)| {
            let column = filled_column(&rows, |row| row.weather.value(*field), *fill)?;
            Some((*field, column))
        })
        .collect();
    if columns.is_empty() {
        return None;
    }

    let n = rows.len();
    let y_mean = stats::mean(&target)?;

    // Standardize; constant columns drop out with a zero coefficient
    let mut coefficients = BTreeMap::new();
    let mut active: Vec<(WeatherField, f64, f64, Vec<f64>)> = Vec::new();
    for (field, column) in columns {
        let mean = stats::mean(&column)?;
        let std = stats::sample_std(&column)?;
        if std < 1e-12 {
            coefficients.insert(field, 0.0);
            continue;
        }
        let z = column.iter().map(|v| (v - mean) / std).collect();
        active.push((field, mean, std, z));
    }

    let k = active.len();
    let a: Vec<Vec<f64>> = (0..k)
        .map(|i| {
            (0..k)
                .map(|j| dot(&active[i].3, &active[j].3))
                .collect()
        })
        .collect();
    let centered: Vec<f64> = target.iter().map(|v| v - y_mean).collect();
    let b: Vec<f64> = active.iter().map(|(_, _, _, z)| dot(z, &centered)).collect();

    let scaled = if k == 0 {
        Vec::new()
    } else {
        let Some(solution) = stats::solve_linear_system(a, b) else {
            debug!("Collinear weather features, no traffic model");
            return None;
        };
        solution
    };

    let mut intercept = y_mean;
    for ((field, mean, std, _), beta) in active.iter().zip(&scaled) {
        let coefficient = beta / std;
        intercept -= coefficient * mean;
        coefficients.insert(*field, coefficient);
    }

    let ss_res: f64 = (0..n)
        .map(|i| {
            let fitted: f64 = active
                .iter()
                .zip(&scaled)
                .map(|((_, _, _, z), beta)| beta * z[i])
                .sum::<f64>()
                + y_mean;
            (target[i] - fitted).powi(2)
        })
        .sum();
    let ss_tot: f64 = centered.iter().map(|v| v * v).sum();

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };
    let mse = ss_res / n as f64;

    debug!(r2, mse, features = coefficients.len(), "Fitted traffic model");
    Some(TrafficModel {
        r2,
        mse,
        rmse: mse.sqrt(),
        coefficients,
        intercept,
        n_samples: n,
    })
}

/// Column over the aligned rows with gaps filled; `None` when the column
/// has no reading at all.
fn filled_column(
    rows: &[AlignedDay<'_>],
    read: impl Fn(&AlignedDay<'_>) -> Option<f64>,
    fill: Fill,
) -> Option<Vec<f64>> {
    let raw: Vec<Option<f64>> = rows.iter().map(read).collect();
    let present: Vec<f64> = raw.iter().flatten().copied().collect();
    let fill_value = match fill {
        Fill::Mean => stats::mean(&present)?,
        Fill::Zero if present.is_empty() => return None,
        Fill::Zero => 0.0,
    };
    Some(raw.into_iter().map(|v| v.unwrap_or(fill_value)).collect())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 1).unwrap() + Days::new(i as u64)
    }

    fn dataset(n: usize) -> (Vec<WeatherRecord>, Vec<TrafficRecord>) {
        let mut weather = Vec::new();
        let mut traffic = Vec::new();
        for i in 0..n {
            let max = 50.0 + (i * 7 % 13) as f64;
            let wind = 5.0 + (i * 3 % 5) as f64;
            let mut record = WeatherRecord::new(date(i));
            record.index = i;
            record.max_temp = Some(max);
            record.wind_speed = Some(wind);
            weather.push(record);
            traffic.push(TrafficRecord::new(date(i), 1000.0 + 3.0 * max - 2.0 * wind));
        }
        (weather, traffic)
    }

    #[test]
    fn test_recovers_exact_linear_relation() {
        let (weather, traffic) = dataset(15);
        let model = fit_traffic_model(&weather, &traffic, MIN_SAMPLES).unwrap();

        assert_eq!(model.n_samples, 15);
        assert!((model.r2 - 1.0).abs() < 1e-9);
        assert!(model.rmse < 1e-6);
        assert!((model.coefficients[&WeatherField::MaxTemp] - 3.0).abs() < 1e-9);
        assert!((model.coefficients[&WeatherField::WindSpeed] + 2.0).abs() < 1e-9);
        assert!((model.intercept - 1000.0).abs() < 1e-6);
        assert!(!model.coefficients.contains_key(&WeatherField::Precipitation));

        let predicted = model.predict(&weather[3]);
        assert!((predicted - traffic[3].traffic_volume.unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_requires_minimum_samples() {
        let (weather, traffic) = dataset(9);
        assert!(fit_traffic_model(&weather, &traffic, MIN_SAMPLES).is_none());
    }

    #[test]
    fn test_constant_feature_gets_zero_coefficient() {
        let (mut weather, traffic) = dataset(12);
        for record in &mut weather {
            record.snowfall = Some(0.0);
        }
        let model = fit_traffic_model(&weather, &traffic, MIN_SAMPLES).unwrap();
        assert_eq!(model.coefficients[&WeatherField::Snowfall], 0.0);
        assert!((model.r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_features_yield_no_model() {
        let (mut weather, traffic) = dataset(12);
        for record in &mut weather {
            record.min_temp = record.max_temp.map(|t| t - 10.0);
        }
        assert!(fit_traffic_model(&weather, &traffic, MIN_SAMPLES).is_none());
    }

    #[test]
    fn test_missing_volume_filled_with_mean() {
        let (weather, mut traffic) = dataset(12);
        traffic[0].traffic_volume = None;
        let model = fit_traffic_model(&weather, &traffic, MIN_SAMPLES).unwrap();
        assert_eq!(model.n_samples, 12);
        assert!(model.r2 < 1.0);
    }
}
