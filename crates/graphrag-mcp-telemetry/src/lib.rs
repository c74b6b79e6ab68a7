//! Structured logging for the GraphRAG MCP client
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and a `fmt`
//! layer (JSON or pretty, stdout or stderr). The client crates only emit
//! events; whether and how they are printed is decided here.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use graphrag_mcp_telemetry::TelemetryConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let _guard = TelemetryConfig::builder()
//!         .service_name("rag-comparison")
//!         .log_level("info,graphrag_mcp_client=debug")
//!         .json_logs(false)
//!         .build()
//!         .init()?;
//!
//!     // Client code here...
//!     Ok(())
//! }
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

mod config;
mod error;
mod init;

// Re-exports
pub use config::{DEFAULT_LOG_LEVEL, TelemetryConfig, TelemetryConfigBuilder};
pub use error::{TelemetryError, TelemetryResult};
pub use init::TelemetryGuard;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};
