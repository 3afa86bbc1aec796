//! Correlation and impact result models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::traffic::TrafficField;
use super::weather::WeatherField;

/// Fixed weather/traffic variable pairs the correlation engine evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationPair {
    TemperatureTraffic,
    MinTemperatureTraffic,
    PrecipitationTraffic,
    WindTraffic,
    SnowTraffic,
    TemperatureSpeed,
    PrecipitationSpeed,
}

impl CorrelationPair {
    pub const ALL: [CorrelationPair; 7] = [
        CorrelationPair::TemperatureTraffic,
        CorrelationPair::MinTemperatureTraffic,
        CorrelationPair::PrecipitationTraffic,
        CorrelationPair::WindTraffic,
        CorrelationPair::SnowTraffic,
        CorrelationPair::TemperatureSpeed,
        CorrelationPair::PrecipitationSpeed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationPair::TemperatureTraffic => "temperature_traffic",
            CorrelationPair::MinTemperatureTraffic => "min_temperature_traffic",
            CorrelationPair::PrecipitationTraffic => "precipitation_traffic",
            CorrelationPair::WindTraffic => "wind_traffic",
            CorrelationPair::SnowTraffic => "snow_traffic",
            CorrelationPair::TemperatureSpeed => "temperature_speed",
            CorrelationPair::PrecipitationSpeed => "precipitation_speed",
        }
    }

    /// The (weather, traffic) fields this pair relates
    #[must_use]
    pub fn fields(self) -> (WeatherField, TrafficField) {
        match self {
            CorrelationPair::TemperatureTraffic => {
                (WeatherField::MaxTemp, TrafficField::TrafficVolume)
            }
            CorrelationPair::MinTemperatureTraffic => {
                (WeatherField::MinTemp, TrafficField::TrafficVolume)
            }
            CorrelationPair::PrecipitationTraffic => {
                (WeatherField::Precipitation, TrafficField::TrafficVolume)
            }
            CorrelationPair::WindTraffic => (WeatherField::WindSpeed, TrafficField::TrafficVolume),
            CorrelationPair::SnowTraffic => (WeatherField::Snowfall, TrafficField::TrafficVolume),
            CorrelationPair::TemperatureSpeed => (WeatherField::MaxTemp, TrafficField::AvgSpeed),
            CorrelationPair::PrecipitationSpeed => {
                (WeatherField::Precipitation, TrafficField::AvgSpeed)
            }
        }
    }

    /// Human-readable title, e.g. "Temperature Traffic"
    #[must_use]
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CorrelationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Magnitude bucket of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl CorrelationStrength {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Negligible => "negligible",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pearson correlation of one variable pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson r in [-1, 1]
    pub correlation: f64,
    pub strength: CorrelationStrength,
    /// Two-tailed p-value under the no-association null hypothesis
    pub p_value: f64,
    /// Paired observations the coefficient was computed from
    pub sample_size: usize,
}

impl CorrelationResult {
    /// Whether the correlation is significant at `alpha`
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Weather conditions the impact analyzer compares against normal days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Heatwave,
    HeavyRain,
    Snowstorm,
    HighWind,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Heatwave,
        WeatherCondition::HeavyRain,
        WeatherCondition::Snowstorm,
        WeatherCondition::HighWind,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCondition::Heatwave => "heatwave",
            WeatherCondition::HeavyRain => "heavy_rain",
            WeatherCondition::Snowstorm => "snowstorm",
            WeatherCondition::HighWind => "high_wind",
        }
    }

    #[must_use]
    pub fn field(self) -> WeatherField {
        match self {
            WeatherCondition::Heatwave => WeatherField::MaxTemp,
            WeatherCondition::HeavyRain => WeatherField::Precipitation,
            WeatherCondition::Snowstorm => WeatherField::Snowfall,
            WeatherCondition::HighWind => WeatherField::WindSpeed,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic on extreme days compared with normal days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub avg_traffic_extreme: f64,
    pub avg_traffic_normal: f64,
    /// (normal − extreme) / normal × 100; positive means less traffic
    pub relative_change_pct: f64,
    pub extreme_day_count: usize,
    pub normal_day_count: usize,
}
