//! Weather/traffic analysis over date-aligned series

pub mod alignment;
pub mod correlation;
pub mod impact;
pub mod regression;

pub use alignment::{AlignedDay, align, paired_values};
pub use correlation::{
    CorrelationEngine, correlate, correlation_strength, correlation_with_p_value,
};
pub use impact::{ImpactAnalyzer, analyze_impact};
pub use regression::{TrafficModel, fit_traffic_model};
