//! Seeded sample data: a synthetic daily weather and traffic series for
//! demos and tests.
//!
//! The same seed and date range always produce the same data.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Gamma, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InsightsError;
use crate::models::{CongestionLevel, RawWeatherRecord, TrafficRecord};

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 42;

const HEAVY_RAIN_DAYS: usize = 20;
const HIGH_WIND_DAYS: usize = 15;
const SNOWSTORM_DAYS: usize = 5;
const WINTER_MONTHS: [u32; 3] = [12, 1, 2];

const BASE_TEMPERATURE: f64 = 50.0;
const BASE_TRAFFIC: f64 = 100_000.0;
const MIN_TRAFFIC: f64 = 50_000.0;
const MIN_SPEED: f64 = 15.0;
const WEEKEND_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    pub weather: Vec<RawWeatherRecord>,
    pub traffic: Vec<TrafficRecord>,
}

/// Default sample range: calendar year 2023
#[must_use]
pub fn default_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
    )
}

/// Generate one weather and one traffic record per day from `start` to
/// `end` inclusive.
#[tracing::instrument(level = "debug")]
pub fn generate_sample_data(
    seed: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> crate::Result<SampleData> {
    if start > end {
        return Err(InsightsError::validation(
            "Start date must be before end date",
        ));
    }

    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let n = dates.len();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let temperature_noise = Normal::<f64>::new(0.0, 10.0).map_err(distribution_error)?;
    // Means of 0.1 in for rain and 0.5 in for winter snow
    let rain = Exp::<f64>::new(10.0).map_err(distribution_error)?;
    let snowfall = Exp::<f64>::new(2.0).map_err(distribution_error)?;
    let wind_speed = Gamma::<f64>::new(2.0, 5.0).map_err(distribution_error)?;
    let traffic_noise = Normal::<f64>::new(0.0, 5_000.0).map_err(distribution_error)?;
    let avg_speed = Normal::<f64>::new(35.0, 5.0).map_err(distribution_error)?;

    // Weather
    let max_temps: Vec<f64> = (0..n)
        .map(|i| BASE_TEMPERATURE + 30.0 * seasonal(i) + temperature_noise.sample(&mut rng))
        .collect();
    let min_temps: Vec<f64> = max_temps
        .iter()
        .map(|t| t - rng.gen_range(10.0..20.0))
        .collect();

    let mut precipitation: Vec<f64> = (0..n).map(|_| rain.sample(&mut rng)).collect();
    for day in index::sample(&mut rng, n, HEAVY_RAIN_DAYS.min(n)).into_vec() {
        precipitation[day] = rng.gen_range(1.0..3.0);
    }

    let mut wind: Vec<f64> = (0..n).map(|_| wind_speed.sample(&mut rng)).collect();
    for day in index::sample(&mut rng, n, HIGH_WIND_DAYS.min(n)).into_vec() {
        wind[day] = rng.gen_range(20.0..35.0);
    }

    let mut snow = vec![0.0; n];
    let winter: Vec<usize> = (0..n)
        .filter(|i| WINTER_MONTHS.contains(&dates[*i].month()))
        .collect();
    for day in &winter {
        snow[*day] = snowfall.sample(&mut rng);
    }
    let storms: Vec<usize> = winter
        .choose_multiple(&mut rng, SNOWSTORM_DAYS.min(winter.len()))
        .copied()
        .collect();
    for day in storms {
        snow[day] = rng.gen_range(5.0..12.0);
    }

    let weather = dates
        .iter()
        .enumerate()
        .map(|(i, date)| RawWeatherRecord {
            max_temp: Some(max_temps[i]),
            min_temp: Some(min_temps[i]),
            precipitation: Some(precipitation[i]),
            wind_speed: Some(wind[i]),
            snowfall: Some(snow[i]),
            ..RawWeatherRecord::dated(date.format("%Y-%m-%d").to_string())
        })
        .collect();

    // Traffic
    let traffic = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let weekly = if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                WEEKEND_FACTOR
            } else {
                1.0
            };
            let volume =
                (BASE_TRAFFIC + 20_000.0 * seasonal(i) + traffic_noise.sample(&mut rng)) * weekly;
            let speed = avg_speed.sample(&mut rng);

            TrafficRecord {
                date: *date,
                city: None,
                traffic_volume: Some(volume.max(MIN_TRAFFIC)),
                avg_speed: Some(speed.max(MIN_SPEED)),
                congestion_level: Some(sample_congestion(&mut rng)),
            }
        })
        .collect();

    debug!(days = n, seed, "Generated sample data");
    Ok(SampleData { weather, traffic })
}

/// Yearly cycle position of day `i`, in [-1, 1]
fn seasonal(i: usize) -> f64 {
    (2.0 * PI * i as f64 / 365.0).sin()
}

fn distribution_error(err: impl std::fmt::Display) -> InsightsError {
    InsightsError::general(format!("Invalid sample distribution: {err}"))
}

/// Low 60%, medium 30%, high 10%
fn sample_congestion(rng: &mut ChaCha8Rng) -> CongestionLevel {
    let roll: f64 = rng.r#gen();
    if roll < 0.6 {
        CongestionLevel::Low
    } else if roll < 0.9 {
        CongestionLevel::Medium
    } else {
        CongestionLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year() -> SampleData {
        let (start, end) = default_range();
        generate_sample_data(DEFAULT_SEED, start, end).unwrap()
    }

    #[test]
    fn test_one_record_per_day() {
        let data = year();
        assert_eq!(data.weather.len(), 365);
        assert_eq!(data.traffic.len(), 365);
        assert_eq!(data.weather[0].date.as_deref(), Some("2023-01-01"));
        assert_eq!(data.traffic[364].date.to_string(), "2023-12-31");
    }

    #[test]
    fn test_same_seed_same_data() {
        let (start, end) = default_range();
        let a = generate_sample_data(7, start, end).unwrap();
        let b = generate_sample_data(7, start, end).unwrap();
        let c = generate_sample_data(8, start, end).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_value_bounds() {
        let data = year();
        for (w, t) in data.weather.iter().zip(&data.traffic) {
            let (max, min) = (w.max_temp.unwrap(), w.min_temp.unwrap());
            assert!(max - min > 10.0 - 1e-9 && max - min < 20.0 + 1e-9);
            assert!(w.precipitation.unwrap() >= 0.0);
            assert!(w.wind_speed.unwrap() >= 0.0);
            assert!(t.traffic_volume.unwrap() >= MIN_TRAFFIC);
            assert!(t.avg_speed.unwrap() >= MIN_SPEED);
        }
    }

    #[test]
    fn test_injected_extremes() {
        let data = year();
        let heavy = data.weather.iter().filter(|w| w.precipitation.unwrap() >= 1.0).count();
        assert!(heavy >= HEAVY_RAIN_DAYS);
        let windy = data.weather.iter().filter(|w| w.wind_speed.unwrap() >= 20.0).count();
        assert!(windy >= HIGH_WIND_DAYS);
        let storms = data.weather.iter().filter(|w| w.snowfall.unwrap() >= 5.0).count();
        assert!(storms >= SNOWSTORM_DAYS);
    }

    #[test]
    fn test_snow_only_in_winter() {
        let data = year();
        for (w, t) in data.weather.iter().zip(&data.traffic) {
            if !WINTER_MONTHS.contains(&t.date.month()) {
                assert_eq!(w.snowfall, Some(0.0));
            }
        }
    }

    #[test]
    fn test_rejects_inverted_range() {
        let (start, end) = default_range();
        assert!(generate_sample_data(1, end, start).is_err());
    }

    #[test]
    fn test_single_day_range() {
        let (start, _) = default_range();
        let data = generate_sample_data(1, start, start).unwrap();
        assert_eq!(data.weather.len(), 1);
        assert_eq!(data.traffic.len(), 1);
    }
}
