//! Settings loaded from a TOML file and/or `GRAPHRAG_MCP_*` environment variables.
//!
//! Every field is optional; anything left unset keeps the library default.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GRAPHRAG_MCP_ENDPOINT` | MCP endpoint URL |
//! | `GRAPHRAG_MCP_TIMEOUT_SECS` | HTTP timeout |
//! | `GRAPHRAG_MCP_PROTOCOL_VERSION` | Handshake protocol version |
//! | `GRAPHRAG_MCP_MAX_RETRIES` | Retries after the first attempt |
//! | `GRAPHRAG_MCP_BACKOFF_UNIT_MS` | Linear backoff unit |
//! | `GRAPHRAG_MCP_QUERY_TOOL` | Tool invoked by queries |
//! | `GRAPHRAG_MCP_MAX_COMMUNES` | `max_communes` argument |
//! | `GRAPHRAG_MCP_DEFAULT_MODE` | Default query mode |
//! | `GRAPHRAG_MCP_DEFAULT_COMMUNE` | Default commune |
//! | `GRAPHRAG_MCP_RATE_LIMIT_INTERVAL_MS` | Scoring limiter interval |
//! | `GRAPHRAG_MCP_LOG_LEVEL` | Log filter |
//! | `GRAPHRAG_MCP_JSON_LOGS` | JSON log output |

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use graphrag_mcp_client::{ClientConfig, ClientError, RetryPolicy};
use graphrag_mcp_ratelimit::RateLimiterConfig;
use graphrag_mcp_telemetry::TelemetryConfig;
use serde::Deserialize;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GRAPHRAG_MCP";

/// Settings error types
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// Settings file not found
    #[error("Settings file not found: {0}")]
    FileNotFound(PathBuf),

    /// Settings parsing error
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] config::ConfigError),

    /// Settings parsed but describe an unusable client
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ClientError),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Raw overrides, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// MCP endpoint URL
    pub endpoint: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Handshake protocol version
    pub protocol_version: Option<String>,
    /// Retries after the first attempt
    pub max_retries: Option<u32>,
    /// Linear backoff unit in milliseconds
    pub backoff_unit_ms: Option<u64>,
    /// Tool invoked by queries
    pub query_tool: Option<String>,
    /// `max_communes` argument
    pub max_communes: Option<u32>,
    /// Default query mode
    pub default_mode: Option<String>,
    /// Default commune
    pub default_commune: Option<String>,
    /// Scoring limiter interval in milliseconds
    pub rate_limit_interval_ms: Option<u64>,
    /// Log filter
    pub log_level: Option<String>,
    /// JSON log output
    pub json_logs: Option<bool>,
}

impl Settings {
    /// Load from `GRAPHRAG_MCP_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value of the wrong type.
    pub fn from_env() -> SettingsResult<Self> {
        Self::build(None, None)
    }

    /// Load from a TOML file, with environment variables taking precedence
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        Self::build(Some(path), None)
    }

    /// Load from an explicit variable map instead of the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value of the wrong type.
    pub fn from_vars(vars: HashMap<String, String>) -> SettingsResult<Self> {
        Self::build(None, Some(vars))
    }

    fn build(path: Option<&Path>, vars: Option<HashMap<String, String>>) -> SettingsResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .source(vars),
        );

        // Values are stored lowercase without a nested separator, so
        // GRAPHRAG_MCP_MAX_RETRIES lands on `max_retries`.
        let settings: Self = builder.build()?.try_deserialize()?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Client configuration with these overrides applied.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Invalid`] if the result does not validate.
    pub fn client_config(&self) -> SettingsResult<ClientConfig> {
        let mut config = ClientConfig::default();

        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ref version) = self.protocol_version {
            config.protocol_version = version.clone();
        }
        config.retry_policy = self.retry_policy(config.retry_policy);
        if let Some(ref tool) = self.query_tool {
            config.query_tool = tool.clone();
        }
        if let Some(max_communes) = self.max_communes {
            config.max_communes = max_communes;
        }
        if self.default_mode.is_some() {
            config.default_mode = self.default_mode.clone();
        }
        if self.default_commune.is_some() {
            config.default_commune = self.default_commune.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn retry_policy(&self, base: RetryPolicy) -> RetryPolicy {
        let policy = match self.max_retries {
            Some(max_retries) => base.with_max_retries(max_retries),
            None => base,
        };
        match (policy, self.backoff_unit_ms) {
            (RetryPolicy::Linear { max_retries, .. }, Some(unit_ms)) => {
                RetryPolicy::linear(Duration::from_millis(unit_ms), max_retries)
            }
            (policy, _) => policy,
        }
    }

    /// Rate limiter configuration with these overrides applied
    pub fn rate_limiter_config(&self) -> RateLimiterConfig {
        match self.rate_limit_interval_ms {
            Some(ms) => RateLimiterConfig::new().with_min_interval(Duration::from_millis(ms)),
            None => RateLimiterConfig::default(),
        }
    }

    /// Telemetry configuration with these overrides applied
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let mut builder = TelemetryConfig::builder();
        if let Some(ref level) = self.log_level {
            builder = builder.log_level(level.clone());
        }
        if let Some(json) = self.json_logs {
            builder = builder.json_logs(json);
        }
        builder.build()
    }
}
