//! Configuration management for the weather/traffic analyzer
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::InsightsError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Extreme weather thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Correlation and regression settings
    #[serde(default)]
    pub correlation: CorrelationConfig,
    /// Rolling-window anomaly settings
    #[serde(default)]
    pub anomalies: AnomalyConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thresholds that classify a day or a run of days as extreme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Heatwave day: max temperature strictly above this (°F)
    #[serde(default = "default_heatwave_temp")]
    pub heatwave_temp_f: f64,
    /// Cold spell day: min temperature strictly below this (°F)
    #[serde(default = "default_cold_spell_temp")]
    pub cold_spell_temp_f: f64,
    /// Heavy rain day: precipitation strictly above this (in)
    #[serde(default = "default_heavy_rain")]
    pub heavy_rain_in: f64,
    /// Snowstorm day: snowfall strictly above this (in)
    #[serde(default = "default_snowstorm")]
    pub snowstorm_in: f64,
    /// High wind day: wind speed strictly above this (mph)
    #[serde(default = "default_high_wind")]
    pub high_wind_mph: f64,
    /// Wind speed from which a high wind day is rated extreme (mph)
    #[serde(default = "default_extreme_wind")]
    pub extreme_wind_mph: f64,
    /// Minimum consecutive days for a heatwave
    #[serde(default = "default_heatwave_days")]
    pub heatwave_min_days: usize,
    /// Minimum consecutive days for a cold spell
    #[serde(default = "default_cold_spell_days")]
    pub cold_spell_min_days: usize,
    /// Minimum consecutive dry days for a drought
    #[serde(default = "default_drought_days")]
    pub drought_min_days: usize,
}

/// Correlation strength buckets and significance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default = "default_strong")]
    pub strong: f64,
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    #[serde(default = "default_weak")]
    pub weak: f64,
    /// p-value below which a correlation is reported as significant
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
    /// Minimum aligned samples before fitting the traffic model
    #[serde(default = "default_min_regression_samples")]
    pub min_regression_samples: usize,
}

/// Rolling-window anomaly settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Window (records) of the weather rolling mean
    #[serde(default = "default_weather_window")]
    pub weather_window: usize,
    /// Window (records) of the traffic rolling mean/std
    #[serde(default = "default_traffic_window")]
    pub traffic_window: usize,
    /// Standard deviations from the rolling mean that flag a traffic anomaly
    #[serde(default = "default_traffic_sigma")]
    pub traffic_sigma: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_heatwave_temp() -> f64 {
    90.0
}

fn default_cold_spell_temp() -> f64 {
    32.0
}

fn default_heavy_rain() -> f64 {
    2.0
}

fn default_snowstorm() -> f64 {
    6.0
}

fn default_high_wind() -> f64 {
    20.0
}

fn default_extreme_wind() -> f64 {
    50.0
}

fn default_heatwave_days() -> usize {
    3
}

fn default_cold_spell_days() -> usize {
    3
}

fn default_drought_days() -> usize {
    7
}

fn default_strong() -> f64 {
    0.7
}

fn default_moderate() -> f64 {
    0.5
}

fn default_weak() -> f64 {
    0.3
}

fn default_significance_level() -> f64 {
    0.05
}

fn default_min_regression_samples() -> usize {
    10
}

fn default_weather_window() -> usize {
    30
}

fn default_traffic_window() -> usize {
    7
}

fn default_traffic_sigma() -> f64 {
    2.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            heatwave_temp_f: default_heatwave_temp(),
            cold_spell_temp_f: default_cold_spell_temp(),
            heavy_rain_in: default_heavy_rain(),
            snowstorm_in: default_snowstorm(),
            high_wind_mph: default_high_wind(),
            extreme_wind_mph: default_extreme_wind(),
            heatwave_min_days: default_heatwave_days(),
            cold_spell_min_days: default_cold_spell_days(),
            drought_min_days: default_drought_days(),
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            strong: default_strong(),
            moderate: default_moderate(),
            weak: default_weak(),
            significance_level: default_significance_level(),
            min_regression_samples: default_min_regression_samples(),
        }
    }
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            weather_window: default_weather_window(),
            traffic_window: default_traffic_window(),
            traffic_sigma: default_traffic_sigma(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl InsightsConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WXTRAFFIC_THRESHOLDS__HEATWAVE_TEMP_F=95
        builder = builder.add_source(
            Environment::with_prefix("WXTRAFFIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: InsightsConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-traffic").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_thresholds()?;
        self.validate_correlation()?;
        self.validate_anomalies()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_thresholds(&self) -> Result<()> {
        let t = &self.thresholds;

        let amounts = [
            ("heavy rain", t.heavy_rain_in),
            ("snowstorm", t.snowstorm_in),
            ("high wind", t.high_wind_mph),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(InsightsError::config(format!(
                    "{name} threshold must be a non-negative number"
                ))
                .into());
            }
        }

        if t.extreme_wind_mph < t.high_wind_mph {
            return Err(InsightsError::config(
                "Extreme wind threshold cannot be below the high wind threshold",
            )
            .into());
        }

        if t.heatwave_temp_f <= t.cold_spell_temp_f {
            return Err(InsightsError::config(
                "Heatwave temperature must be above the cold spell temperature",
            )
            .into());
        }

        if t.heatwave_min_days == 0 || t.cold_spell_min_days == 0 || t.drought_min_days == 0 {
            return Err(
                InsightsError::config("Minimum run lengths must be at least 1 day").into(),
            );
        }

        Ok(())
    }

    fn validate_correlation(&self) -> Result<()> {
        let c = &self.correlation;

        if !(0.0 < c.weak && c.weak < c.moderate && c.moderate < c.strong && c.strong <= 1.0) {
            return Err(InsightsError::config(
                "Correlation strength thresholds must satisfy 0 < weak < moderate < strong <= 1",
            )
            .into());
        }

        if !(0.0 < c.significance_level && c.significance_level < 1.0) {
            return Err(
                InsightsError::config("Significance level must be between 0 and 1").into(),
            );
        }

        if c.min_regression_samples < 3 {
            return Err(InsightsError::config(
                "Regression needs at least 3 samples to be meaningful",
            )
            .into());
        }

        Ok(())
    }

    fn validate_anomalies(&self) -> Result<()> {
        let a = &self.anomalies;

        if a.weather_window < 2 || a.traffic_window < 2 {
            return Err(
                InsightsError::config("Rolling windows must span at least 2 records").into(),
            );
        }

        if !a.traffic_sigma.is_finite() || a.traffic_sigma <= 0.0 {
            return Err(
                InsightsError::config("Traffic anomaly sigma must be a positive number").into(),
            );
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(InsightsError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(InsightsError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = InsightsConfig::default();
        assert_eq!(config.thresholds.heatwave_temp_f, 90.0);
        assert_eq!(config.thresholds.cold_spell_temp_f, 32.0);
        assert_eq!(config.thresholds.drought_min_days, 7);
        assert_eq!(config.correlation.strong, 0.7);
        assert_eq!(config.anomalies.weather_window, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = InsightsConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_strength_order() {
        let mut config = InsightsConfig::default();
        config.correlation.moderate = 0.8;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("weak < moderate < strong"));
    }

    #[test]
    fn test_config_validation_zero_run_length() {
        let mut config = InsightsConfig::default();
        config.thresholds.drought_min_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_wind_order() {
        let mut config = InsightsConfig::default();
        config.thresholds.extreme_wind_mph = 10.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Extreme wind"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "weather-traffic-config-{}.toml",
            std::process::id()
        ));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "[thresholds]\nheatwave_temp_f = 95.0\n\n[logging]\nlevel = \"debug\"")
                .unwrap();
        }

        let config = InsightsConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.thresholds.heatwave_temp_f, 95.0);
        assert_eq!(config.thresholds.cold_spell_temp_f, 32.0);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = InsightsConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weather-traffic"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
