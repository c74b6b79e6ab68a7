//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use graphrag_mcp_protocol::{DEFAULT_PROTOCOL_VERSION, Implementation};

use crate::error::{ClientError, ClientResult};
use crate::retry::RetryPolicy;

/// Default MCP endpoint of the hosted GraphRAG service
pub const DEFAULT_ENDPOINT: &str = "https://graphragmcp-production.up.railway.app/mcp";

/// Default bound on a single HTTP exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tool answering questions with community-first retrieval
pub const DEFAULT_QUERY_TOOL: &str = "grand_debat_query_fast";

/// Communes searched per query (all of them)
pub const DEFAULT_MAX_COMMUNES: u32 = 50;

/// Configuration for [`McpGraphRagClient`](crate::McpGraphRagClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Full MCP endpoint URL. A trailing slash is ignored.
    ///
    /// Default: the hosted GraphRAG service
    pub endpoint: String,

    /// Bound on each HTTP exchange (connect, send and body read).
    ///
    /// Default: 120 seconds
    pub timeout: Duration,

    /// Protocol version declared in the handshake.
    ///
    /// Default: `2024-11-05`
    pub protocol_version: String,

    /// Identity sent as `clientInfo`
    pub client_info: Implementation,

    /// Retry policy for tool calls.
    ///
    /// Default: linear, 1 s unit, 2 retries
    pub retry_policy: RetryPolicy,

    /// User agent string (set to None to disable User-Agent header)
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,

    /// Tool invoked by queries
    pub query_tool: String,

    /// `max_communes` argument sent with each query
    pub max_communes: u32,

    /// Query mode (`local` or `global`) sent with every query.
    ///
    /// Default: unset; the fast tool then searches all communes
    pub default_mode: Option<String>,

    /// Commune sent with every query. Default: unset
    pub default_commune: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            client_info: Implementation::new("opik-experiment", "1.0.0"),
            retry_policy: RetryPolicy::default(),
            user_agent: Some(format!("GraphRAG-MCP-Client/{}", env!("CARGO_PKG_VERSION"))),
            headers: HashMap::new(),
            query_tool: DEFAULT_QUERY_TOOL.to_string(),
            max_communes: DEFAULT_MAX_COMMUNES,
            default_mode: None,
            default_commune: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the protocol version
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Set the client identity
    pub fn with_client_info(mut self, client_info: Implementation) -> Self {
        self.client_info = client_info;
        self
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Set or clear the user agent
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the tool invoked by queries
    pub fn with_query_tool(mut self, tool: impl Into<String>) -> Self {
        self.query_tool = tool.into();
        self
    }

    /// Set the `max_communes` argument
    pub fn with_max_communes(mut self, max_communes: u32) -> Self {
        self.max_communes = max_communes;
        self
    }

    /// Set the default mode
    pub fn with_default_mode(mut self, mode: impl Into<String>) -> Self {
        self.default_mode = Some(mode.into());
        self
    }

    /// Set the default commune
    pub fn with_default_commune(mut self, commune: impl Into<String>) -> Self {
        self.default_commune = Some(commune.into());
        self
    }

    /// Endpoint with any trailing slash removed
    pub fn endpoint_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Check that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the endpoint is not an
    /// absolute `http`/`https` URL, the timeout is zero, or the query tool
    /// name is empty.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(self.endpoint_url()).map_err(|e| {
            ClientError::Configuration(format!("Invalid endpoint '{}': {e}", self.endpoint))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "Unsupported endpoint scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Configuration(
                "Timeout must be greater than zero".to_string(),
            ));
        }
        if self.query_tool.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Query tool name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
