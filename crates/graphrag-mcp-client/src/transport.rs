//! HTTP exchange with the MCP endpoint.
//!
//! [`McpTransport`] is the seam between the session/retry logic and the
//! network: one POST per JSON-RPC message, plus a best-effort DELETE to end a
//! session. [`HttpTransport`] is the `reqwest` implementation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use graphrag_mcp_protocol::JsonRpcRequest;
use graphrag_mcp_streamable::{SessionId, headers as mcp_headers};
use reqwest::header;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// What came back from one POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// `Mcp-Session-Id` response header, if present and non-empty
    pub session_id: Option<SessionId>,
    /// Full response body
    pub body: String,
}

impl HttpReply {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends JSON-RPC messages to a single MCP endpoint.
pub trait McpTransport: Send + Sync + fmt::Debug {
    /// POST one message, attaching `session` as the `Mcp-Session-Id` header.
    ///
    /// Non-success statuses are returned as replies, not errors. Errors are
    /// reserved for the exchange itself (timeout, connection failure).
    fn post(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionId>,
    ) -> Pin<Box<dyn Future<Output = ClientResult<HttpReply>> + Send + '_>>;

    /// Ask the server to drop `session`.
    fn terminate(
        &self,
        session: SessionId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<()>> + Send + '_>>;
}

/// [`McpTransport`] over `reqwest`.
pub struct HttpTransport {
    endpoint: String,
    timeout: Duration,
    headers: header::HeaderMap,
    http_client: reqwest::Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the configuration does not
    /// validate or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut client_builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout);

        if let Some(ref user_agent) = config.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        }

        let http_client = client_builder.build().map_err(|e| {
            ClientError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            endpoint: config.endpoint_url().to_string(),
            timeout: config.timeout,
            headers: Self::base_headers(config),
            http_client,
        })
    }

    /// Endpoint URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn base_headers(config: &ClientConfig) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(mcp_headers::ACCEPT_JSON_AND_SSE),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(mcp_headers::CONTENT_TYPE_JSON),
        );

        // Skip invalid custom headers rather than fail the whole client
        for (key, value) in &config.headers {
            match (
                header::HeaderName::from_bytes(key.as_bytes()),
                header::HeaderValue::from_str(value),
            ) {
                (Ok(k), Ok(v)) => {
                    headers.insert(k, v);
                }
                _ => warn!(header = %key, "Ignoring invalid custom header"),
            }
        }

        headers
    }

    /// Base headers plus `Mcp-Session-Id` when a session is known.
    ///
    /// A session ID that cannot be sent as a header is a protocol error,
    /// so the executor resets the session instead of calling without it.
    fn headers_for(&self, session: Option<&SessionId>) -> ClientResult<header::HeaderMap> {
        let mut headers = self.headers.clone();
        if let Some(session_id) = session {
            let value = header::HeaderValue::from_str(session_id.as_str()).map_err(|_| {
                warn!(session_id = %session_id, "Session ID is not a valid header value");
                ClientError::Protocol(format!(
                    "Invalid session ID header value: {:?}",
                    session_id.as_str()
                ))
            })?;
            headers.insert(mcp_headers::MCP_SESSION_ID, value);
        }
        Ok(headers)
    }
}

impl McpTransport for HttpTransport {
    fn post(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionId>,
    ) -> Pin<Box<dyn Future<Output = ClientResult<HttpReply>> + Send + '_>> {
        Box::pin(async move {
            let body = serde_json::to_vec(&request)?;
            debug!(
                method = %request.method,
                id = %request.id,
                has_session = session.is_some(),
                "Sending MCP request"
            );

            let response = self
                .http_client
                .post(&self.endpoint)
                .headers(self.headers_for(session.as_ref())?)
                .body(body)
                .send()
                .await
                .map_err(|e| ClientError::from_reqwest(e, &request.method, self.timeout))?;

            let status = response.status().as_u16();
            let session_id = response
                .headers()
                .get(mcp_headers::MCP_SESSION_ID)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(SessionId::from);

            let body = response
                .text()
                .await
                .map_err(|e| ClientError::from_reqwest(e, &request.method, self.timeout))?;

            debug!(
                method = %request.method,
                status,
                body_len = body.len(),
                "Received MCP response"
            );

            Ok(HttpReply {
                status,
                session_id,
                body,
            })
        })
    }

    fn terminate(
        &self,
        session: SessionId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<()>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .http_client
                .delete(&self.endpoint)
                .headers(self.headers_for(Some(&session))?)
                .send()
                .await
                .map_err(|e| ClientError::from_reqwest(e, "session/terminate", self.timeout))?;

            debug!(
                session_id = %session,
                status = response.status().as_u16(),
                "Session terminated"
            );
            Ok(())
        })
    }
}
