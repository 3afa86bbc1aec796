//! Record file loading
//!
//! Weather and traffic records are read from JSON files holding one array
//! of records each.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::InsightsError;

/// Load a JSON array of records from `path`
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_records<T: DeserializeOwned>(path: &Path) -> crate::Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(InsightsError::input(format!("{} is empty", path.display())));
    }

    let records: Vec<T> = serde_json::from_str(&content)?;
    debug!(count = records.len(), "Loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawWeatherRecord, TrafficRecord};
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("loader_{}_{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_weather_records() {
        let path = write_temp(
            "weather.json",
            r#"[{"date": "2023-07-01", "TMAX": 95.0}, {"date": "2023-07-02"}]"#,
        );
        let records: Vec<RawWeatherRecord> = load_records(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].max_temp, Some(95.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_records::<TrafficRecord>(Path::new("/nonexistent/traffic.json"))
            .unwrap_err();
        assert!(matches!(err, InsightsError::Io { .. }));
    }

    #[test]
    fn test_empty_file_is_input_error() {
        let path = write_temp("empty.json", "  \n");
        let err = load_records::<TrafficRecord>(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, InsightsError::Input { .. }));
        assert!(err.user_message().contains("is empty"));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let path = write_temp("malformed.json", r#"{"date": "2023-07-01"}"#);
        let err = load_records::<RawWeatherRecord>(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(matches!(err, InsightsError::Json { .. }));
    }
}
