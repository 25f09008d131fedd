//! Error types for configuration, snapshot loading and batch evaluation
//!
//! Scoring itself is total and never fails; these errors only surface at
//! the edges of the engine.

use thiserror::Error;

/// Result type alias for health score operations
pub type Result<T> = std::result::Result<T, HealthError>;

/// Main error type for health score operations
#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Weight table for {category} totals {total} points, above the {ceiling} point ceiling")]
    InvalidWeights {
        category: String,
        total: f64,
        ceiling: f64,
    },

    #[error("Invalid scoring scale for {component}: {reason}")]
    InvalidScale { component: String, reason: String },

    #[error("Invalid input snapshot: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Evaluation task for {label} failed: {message}")]
    TaskFailed { label: String, message: String },
}

impl HealthError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid scale error
    pub fn invalid_scale(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScale {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            label: label.into(),
            message: message.into(),
        }
    }
}
