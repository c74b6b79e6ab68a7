//! # GraphRAG MCP Protocol
//!
//! Wire types shared by every crate in the workspace:
//!
//! - **JSON-RPC 2.0**: [`JsonRpcRequest`], [`JsonRpcResponse`], [`JsonRpcError`]
//! - **MCP parameters**: [`InitializeParams`], [`CallToolParams`], [`Implementation`]
//! - **Results**: [`ToolPayload`] (decoded tool output) and [`QueryResult`]
//!   (the caller-facing, normalized outcome of one query)
//!
//! Nothing in this crate performs I/O.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]

pub mod jsonrpc;
pub mod mcp;
pub mod result;

pub use jsonrpc::{
    JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, JsonRpcVersion, RequestId,
};
pub use mcp::{
    CallToolParams, CallToolResult, ContentBlock, DEFAULT_PROTOCOL_VERSION, Implementation,
    InitializeParams, methods,
};
pub use result::{DEFAULT_QUERY_FAILURE, QueryOutcome, QueryResult, QueryStatus, ToolPayload};
