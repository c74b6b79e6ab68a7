//! MCP request parameters and the tool-call result shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::jsonrpc::JsonRpcRequest;

/// Protocol version declared during the initialize handshake
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP method names used by the client
pub mod methods {
    /// Session handshake
    pub const INITIALIZE: &str = "initialize";
    /// Tool invocation
    pub const TOOLS_CALL: &str = "tools/call";
}

/// Caller identity sent in `clientInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Client name
    pub name: String,
    /// Client version
    pub version: String,
}

impl Implementation {
    /// Create a new implementation descriptor
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for Implementation {
    fn default() -> Self {
        Self::new("graphrag-mcp-client", env!("CARGO_PKG_VERSION"))
    }
}

/// Parameters of the `initialize` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by the client
    pub protocol_version: String,
    /// Caller identity
    pub client_info: Implementation,
    /// Client capabilities (always empty for this client)
    pub capabilities: Map<String, Value>,
}

impl InitializeParams {
    /// Create handshake parameters with an empty capability set
    pub fn new(protocol_version: impl Into<String>, client_info: Implementation) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            client_info,
            capabilities: Map::new(),
        }
    }

    /// Wrap the parameters in an `initialize` request with a fresh id
    pub fn into_request(self) -> Result<JsonRpcRequest, serde_json::Error> {
        let params = serde_json::to_value(self)?;
        Ok(JsonRpcRequest::new(methods::INITIALIZE, Some(params)))
    }
}

/// Parameters of the `tools/call` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the remote tool
    pub name: String,
    /// Tool arguments, opaque to the client
    pub arguments: Map<String, Value>,
}

impl CallToolParams {
    /// Create tool-call parameters
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Wrap the parameters in a `tools/call` request with a fresh id
    pub fn into_request(self) -> Result<JsonRpcRequest, serde_json::Error> {
        let params = serde_json::to_value(self)?;
        Ok(JsonRpcRequest::new(methods::TOOLS_CALL, Some(params)))
    }
}

/// One content block of a tool result. Only text blocks are consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type (`text`, `image`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `result` member of a `tools/call` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// Content blocks
    pub content: Vec<ContentBlock>,
    /// Whether the tool reported an execution error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    /// Text of the first content block, if it carries one
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(|block| block.text.as_deref())
    }
}
