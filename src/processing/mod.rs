//! Weather series processing: cleaning, event detection, summaries and
//! rolling anomalies.

pub mod anomalies;
pub mod cleaner;
pub mod events;
pub mod statistics;

pub use anomalies::{
    AnomalyDirection, TrafficAnomaly, WeatherAnomalies, WeatherAnomaly, traffic_anomalies,
    weather_anomalies,
};
pub use cleaner::{clean, parse_date};
pub use events::{ExtremeEventDetector, detect};
pub use statistics::{WeatherStatistics, calculate_statistics};
