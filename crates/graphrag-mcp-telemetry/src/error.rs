//! Telemetry error types

use thiserror::Error;

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    /// Invalid configuration
    #[error("Invalid telemetry configuration: {0}")]
    InvalidConfiguration(String),

    /// Tracing subscriber error (typically: a global subscriber is already set)
    #[error("Tracing subscriber error: {0}")]
    TracingError(String),
}

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;
