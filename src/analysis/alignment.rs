//! Date alignment of weather and traffic series

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{TrafficField, TrafficRecord, WeatherField, WeatherRecord};

/// One weather record paired with one traffic record of the same date
#[derive(Debug, Clone, Copy)]
pub struct AlignedDay<'a> {
    pub weather: &'a WeatherRecord,
    pub traffic: &'a TrafficRecord,
}

impl AlignedDay<'_> {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.weather.date
    }
}

/// Inner join on exact date.
///
/// Every matching (weather, traffic) pair yields one row, so a date with
/// several traffic records (one per city) yields several rows. Rows follow
/// traffic order within weather order.
#[must_use]
pub fn align<'a>(
    weather: &'a [WeatherRecord],
    traffic: &'a [TrafficRecord],
) -> Vec<AlignedDay<'a>> {
    let mut by_date: HashMap<NaiveDate, Vec<&TrafficRecord>> = HashMap::new();
    for record in traffic {
        by_date.entry(record.date).or_default().push(record);
    }

    weather
        .iter()
        .flat_map(|w| {
            by_date
                .get(&w.date)
                .into_iter()
                .flatten()
                .map(move |t| AlignedDay {
                    weather: w,
                    traffic: *t,
                })
        })
        .collect()
}

/// Paired (weather, traffic) values of the aligned rows where both are
/// present
#[must_use]
pub fn paired_values(
    rows: &[AlignedDay<'_>],
    weather_field: WeatherField,
    traffic_field: TrafficField,
) -> (Vec<f64>, Vec<f64>) {
    rows.iter()
        .filter_map(|row| {
            Some((
                row.weather.value(weather_field)?,
                row.traffic.value(traffic_field)?,
            ))
        })
        .unzip()
}
