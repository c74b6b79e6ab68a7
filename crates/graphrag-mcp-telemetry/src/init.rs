//! Subscriber installation
//!
//! Provides the [`TelemetryGuard`] returned once logging is set up.

use crate::{TelemetryConfig, TelemetryError, TelemetryResult};
use tracing::info;
use tracing_subscriber::{
    Layer, Registry, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Guard returned by [`TelemetryGuard::init`].
///
/// Keep it alive for as long as the application logs; dropping it records
/// a shutdown event.
#[derive(Debug)]
pub struct TelemetryGuard {
    config: TelemetryConfig,
}

impl TelemetryGuard {
    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// [`TelemetryError::InvalidConfiguration`] if the log level does not
    /// parse, [`TelemetryError::TracingError`] if a global subscriber is
    /// already installed.
    pub fn init(config: TelemetryConfig) -> TelemetryResult<Self> {
        let env_filter = build_filter(&config)?;

        Registry::default()
            .with(fmt_layer(&config))
            .with(env_filter)
            .try_init()
            .map_err(|e| TelemetryError::TracingError(e.to_string()))?;

        info!(
            service_name = %config.service_name,
            service_version = %config.service_version,
            json_logs = config.json_logs,
            stderr_output = config.stderr_output,
            "GraphRAG MCP telemetry initialized"
        );

        Ok(Self { config })
    }

    /// Get the service name
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.config.service_name
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        info!(
            service_name = %self.config.service_name,
            "Shutting down GraphRAG MCP telemetry"
        );
    }
}

/// `RUST_LOG` if set, else the configured level
fn build_filter(config: &TelemetryConfig) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| parse_level(&config.log_level))
}

fn parse_level(level: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| TelemetryError::InvalidConfiguration(format!("Invalid log level: {e}")))
}

fn fmt_layer(config: &TelemetryConfig) -> BoxedLayer {
    match (config.json_logs, config.stderr_output) {
        (true, true) => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed(),
        (true, false) => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed(),
        (false, true) => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .pretty()
            .boxed(),
        (false, false) => fmt::layer().with_target(true).pretty().boxed(),
    }
}
