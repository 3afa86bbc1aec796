//! Error types and handling for the weather/traffic analysis crate
//!
//! The four analytical operations never fail; these errors cover the
//! surrounding layers (configuration, input files, date-range checks).

use thiserror::Error;

/// Main error type for the weather/traffic analysis crate
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Record input that could not be loaded
    #[error("Input error: {message}")]
    Input { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl InsightsError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            InsightsError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            InsightsError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            InsightsError::Input { message } => {
                format!("Could not load records: {message}")
            }
            InsightsError::Io { .. } => {
                "File operation failed. Please check the path and file permissions.".to_string()
            }
            InsightsError::Json { .. } => {
                "Record file is not valid JSON. Expected an array of records.".to_string()
            }
            InsightsError::General { message } => message.clone(),
        }
    }
}
