//! Weather Series Cleaner
//!
//! Turns raw provider rows into an ordered, one-record-per-date series:
//!
//! 1. Coerce the date text to a calendar date; rows without a parseable
//!    date are dropped.
//! 2. Trim sensor-error outliers from each temperature field present in
//!    the series: values outside the field's [p1, p99] band are dropped.
//!    Fields are trimmed in turn, each pass over the survivors of the
//!    previous one. Rows missing the field are kept.
//! 3. Drop rows with negative precipitation or wind speed.
//! 4. Sort by date (stable), keep the first row per date and assign the
//!    0-based positional index.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::{RawWeatherRecord, WeatherField, WeatherRecord};
use crate::stats;

/// Lower percentile of the outlier band
const LOWER_PERCENTILE: f64 = 0.01;
/// Upper percentile of the outlier band
const UPPER_PERCENTILE: f64 = 0.99;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Clean a raw weather series. Never fails; the input is left untouched.
#[tracing::instrument(level = "debug", skip(records), fields(input = records.len()))]
pub fn clean(records: &[RawWeatherRecord]) -> Vec<WeatherRecord> {
    let mut rows: Vec<WeatherRecord> = records.iter().filter_map(to_dated_record).collect();
    let undated = records.len() - rows.len();
    if undated > 0 {
        debug!(dropped = undated, "Dropped records without a parseable date");
    }

    for field in WeatherField::TEMPERATURES {
        trim_outliers(&mut rows, field);
    }

    let before = rows.len();
    rows.retain(|row| {
        WeatherField::NON_NEGATIVE
            .iter()
            .all(|field| row.value(*field).is_none_or(|v| v >= 0.0))
    });
    if rows.len() < before {
        debug!(dropped = before - rows.len(), "Dropped records with negative amounts");
    }

    rows.sort_by_key(|row| row.date);
    let before = rows.len();
    rows.dedup_by_key(|row| row.date);
    if rows.len() < before {
        debug!(dropped = before - rows.len(), "Dropped duplicate dates");
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.index = index;
    }

    debug!(output = rows.len(), "Cleaned weather series");
    rows
}

/// Parse the date formats weather providers commonly export.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
}

fn to_dated_record(raw: &RawWeatherRecord) -> Option<WeatherRecord> {
    let date = parse_date(raw.date.as_deref()?)?;
    // Non-finite readings are missing readings
    let measured = |value: Option<f64>| value.filter(|v| v.is_finite());

    Some(WeatherRecord {
        index: 0,
        date,
        max_temp: measured(raw.max_temp),
        min_temp: measured(raw.min_temp),
        avg_temp: measured(raw.avg_temp),
        precipitation: measured(raw.precipitation),
        wind_speed: measured(raw.wind_speed),
        snowfall: measured(raw.snowfall),
    })
}

fn trim_outliers(rows: &mut Vec<WeatherRecord>, field: WeatherField) {
    let values: Vec<f64> = rows.iter().filter_map(|row| row.value(field)).collect();
    let (Some(low), Some(high)) = (
        stats::percentile(&values, LOWER_PERCENTILE),
        stats::percentile(&values, UPPER_PERCENTILE),
    ) else {
        return;
    };

    let before = rows.len();
    rows.retain(|row| row.value(field).is_none_or(|v| low <= v && v <= high));
    if rows.len() < before {
        debug!(
            %field,
            low,
            high,
            dropped = before - rows.len(),
            "Trimmed temperature outliers"
        );
    }
}
