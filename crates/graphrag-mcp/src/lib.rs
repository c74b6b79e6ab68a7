//! # GraphRAG MCP
//!
//! Resilient client for a GraphRAG knowledge graph served over MCP
//! Streamable HTTP, plus the pieces a benchmark harness needs around it.
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`protocol`] | JSON-RPC envelope, MCP parameters, [`QueryResult`] |
//! | [`streamable`] | Session state, event-stream scanning |
//! | [`client`] | Session manager, resilient executor, [`McpGraphRagClient`] |
//! | [`ratelimit`] | Minimum-interval [`RateLimiter`] for shared scoring APIs |
//! | [`telemetry`] | `tracing` subscriber setup |
//!
//! Configuration can be assembled in code or loaded from the environment
//! with [`Settings`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use graphrag_mcp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let _telemetry = settings.telemetry_config().init()?;
//!
//!     let client = McpGraphRagClient::new(settings.client_config()?)?;
//!     let result = client.query("Quels personnages ?").await;
//!
//!     match result.status() {
//!         QueryStatus::Success => println!("{}", result.answer().unwrap_or_default()),
//!         status => eprintln!("{status} after {:.0} ms", result.latency_ms),
//!     }
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod settings;

pub use graphrag_mcp_client as client;
pub use graphrag_mcp_protocol as protocol;
pub use graphrag_mcp_ratelimit as ratelimit;
pub use graphrag_mcp_streamable as streamable;
pub use graphrag_mcp_telemetry as telemetry;

pub use graphrag_mcp_client::{
    ClientConfig, ClientError, ClientResult, McpGraphRagClient, QueryOptions, RagClient,
    RetryPolicy,
};
pub use graphrag_mcp_protocol::{QueryOutcome, QueryResult, QueryStatus};
pub use graphrag_mcp_ratelimit::{RateLimiter, RateLimiterConfig};
pub use graphrag_mcp_telemetry::{TelemetryConfig, TelemetryGuard};
pub use settings::{Settings, SettingsError, SettingsResult};

/// Convenient imports for typical use
pub mod prelude {
    pub use super::{
        ClientConfig, ClientError, ClientResult, McpGraphRagClient, QueryOptions, QueryOutcome,
        QueryResult, QueryStatus, RagClient, RateLimiter, RateLimiterConfig, RetryPolicy,
        Settings, TelemetryConfig, TelemetryGuard,
    };
}
