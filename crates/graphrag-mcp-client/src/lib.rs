//! # GraphRAG MCP Client
//!
//! A resilient client for a remote MCP tool server exposing a GraphRAG
//! knowledge graph over Streamable HTTP.
//!
//! ## Layers
//!
//! - [`McpTransport`]: one POST per JSON-RPC message ([`HttpTransport`] over `reqwest`)
//! - [`SessionManager`]: lazily runs the `initialize` handshake and keeps the
//!   `Mcp-Session-Id` it yields
//! - [`ResilientExecutor`]: `tools/call` with linear backoff, dropping the
//!   session before every retry
//! - [`McpGraphRagClient`]: turns every outcome into a [`QueryResult`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use graphrag_mcp_client::{ClientConfig, McpGraphRagClient, RetryPolicy};
//!
//! # async fn demo() -> Result<(), graphrag_mcp_client::ClientError> {
//! let config = ClientConfig::new()
//!     .with_endpoint("http://localhost:8000/mcp")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_retry_policy(RetryPolicy::linear(Duration::from_secs(1), 2));
//!
//! let client = McpGraphRagClient::new(config)?;
//! if client.health_check().await {
//!     let result = client.query("Quels personnages ?").await;
//!     println!("{}", result.answer().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod executor;
pub mod query;
pub mod retry;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::{CallFailure, ClientError, ClientResult};
pub use executor::{ExecutorStats, ResilientExecutor};
pub use query::{McpGraphRagClient, QueryOptions, RagClient, SYSTEM_NAME};
pub use retry::{RetryPolicy, resets_session};
pub use session::SessionManager;
pub use transport::{HttpReply, HttpTransport, McpTransport};

pub use graphrag_mcp_protocol::{DEFAULT_QUERY_FAILURE, QueryResult, QueryStatus, ToolPayload};
pub use graphrag_mcp_streamable::SessionId;
