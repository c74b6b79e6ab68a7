//! # GraphRAG MCP Streamable HTTP
//!
//! The parts of the MCP Streamable HTTP transport the client needs, with no I/O:
//!
//! - **Session state**: [`SessionId`] and the [`SessionState`] machine
//! - **Event-stream scanning**: [`scan_tool_payload`] pulls the first usable
//!   tool result out of a `text/event-stream` body
//! - **Header names**: [`headers`]
//!
//! ## Usage
//!
//! ```rust
//! use graphrag_mcp_streamable::{SessionState, scan_tool_payload};
//!
//! let state = SessionState::Absent.establish("abc".into());
//! assert_eq!(state.session_id().map(|id| id.as_str()), Some("abc"));
//!
//! let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{\"content\":[{\"type\":\"text\",\"text\":\"hi\"}]}}\n\n";
//! let payload = scan_tool_payload(body).unwrap();
//! assert_eq!(payload.answer(), Some("hi"));
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod session;
pub mod sse;

pub use session::{SessionId, SessionState};
pub use sse::{SNIPPET_LEN, data_lines, scan_tool_payload, snippet};

/// Streamable HTTP header names and values
pub mod headers {
    /// Session ID header, returned on `initialize` and echoed on every call
    pub const MCP_SESSION_ID: &str = "Mcp-Session-Id";

    /// Content-Type for JSON request bodies
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Content-Type for SSE streams
    pub const CONTENT_TYPE_SSE: &str = "text/event-stream";

    /// Accept header value: the server may answer with either framing
    pub const ACCEPT_JSON_AND_SSE: &str = "application/json, text/event-stream";
}
