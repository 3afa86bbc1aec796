//! Data models for the weather/traffic analysis crate
//!
//! This module contains the core domain models organized by concern:
//! - Weather: raw and cleaned daily weather observations
//! - Traffic: daily traffic counts and speeds
//! - Events: detected extreme weather events
//! - Analysis: correlation and impact results

pub mod analysis;
pub mod events;
pub mod traffic;
pub mod weather;

// Re-export all public types for convenient access
pub use analysis::{
    CorrelationPair, CorrelationResult, CorrelationStrength, ImpactResult, WeatherCondition,
};
pub use events::{
    DetectedEvents, EventCategory, EventShape, ExtremeEvent, PointEvent, RunEvent, Severity,
};
pub use traffic::{CongestionLevel, TrafficField, TrafficRecord};
pub use weather::{RawWeatherRecord, WeatherField, WeatherRecord};
