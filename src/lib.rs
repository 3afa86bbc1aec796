//! Weather/traffic insights
//!
//! This library cleans daily weather series, detects extreme weather
//! events and relates weather to traffic volume and speed through
//! correlation, impact and regression analysis.

pub mod analysis;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod models;
pub mod processing;
pub mod report;
pub mod stats;
pub mod validation;

// Re-export core types for public API
pub use analysis::{
    CorrelationEngine, ImpactAnalyzer, TrafficModel, analyze_impact, correlate,
    correlation_strength, fit_traffic_model,
};
pub use config::InsightsConfig;
pub use error::InsightsError;
pub use fixtures::{SampleData, generate_sample_data};
pub use loader::load_records;
pub use models::{
    CorrelationPair, CorrelationResult, DetectedEvents, EventCategory, ExtremeEvent,
    ImpactResult, RawWeatherRecord, TrafficRecord, WeatherCondition, WeatherRecord,
};
pub use processing::{ExtremeEventDetector, calculate_statistics, clean, detect};
pub use report::{AnalysisReport, WeatherTrafficAnalyzer, analyze_all, format_correlation_results};
pub use validation::validate_date_range;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, InsightsError>;
