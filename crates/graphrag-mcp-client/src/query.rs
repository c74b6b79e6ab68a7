//! Question answering over the remote GraphRAG tool.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use graphrag_mcp_protocol::QueryResult;
use graphrag_mcp_streamable::SessionId;
use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::executor::{ExecutorStats, ResilientExecutor};
use crate::session::SessionManager;
use crate::transport::{HttpTransport, McpTransport};

/// Name reported by [`McpGraphRagClient::system_name`]
pub const SYSTEM_NAME: &str = "graphrag_mcp";

/// A retrieval-augmented answering system that can be queried and probed.
///
/// Implementations never fail a query: every problem is folded into the
/// returned [`QueryResult`].
#[async_trait]
pub trait RagClient: Send + Sync {
    /// Stable identifier of the system
    fn system_name(&self) -> &str;

    /// Answer `question`
    async fn query(&self, question: &str) -> QueryResult;

    /// Whether the system is reachable
    async fn health_check(&self) -> bool;

    /// Release any server-side state
    async fn close(&self);
}

/// Per-query overrides.
///
/// Each field falls back to the matching [`ClientConfig`] value. `mode` and
/// `commune` are forwarded to the tool only when one of the two sets them;
/// otherwise the fast tool matches communities across all communes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Query mode (`local` or `global`)
    pub mode: Option<String>,
    /// Commune to focus on
    pub commune: Option<String>,
    /// Override of `max_communes`
    pub max_communes: Option<u32>,
}

impl QueryOptions {
    /// Options with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a query mode
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Forward a commune
    pub fn with_commune(mut self, commune: impl Into<String>) -> Self {
        self.commune = Some(commune.into());
        self
    }

    /// Override `max_communes`
    pub fn with_max_communes(mut self, max_communes: u32) -> Self {
        self.max_communes = Some(max_communes);
        self
    }
}

/// MCP client for the Grand Débat GraphRAG service.
///
/// # Examples
///
/// ```rust,no_run
/// use graphrag_mcp_client::{ClientConfig, McpGraphRagClient};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = McpGraphRagClient::new(ClientConfig::default())?;
/// let result = client.query("Quels personnages ?").await;
/// println!("{} in {:.0} ms", result.status(), result.latency_ms);
/// client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct McpGraphRagClient {
    config: ClientConfig,
    executor: ResilientExecutor,
}

impl McpGraphRagClient {
    /// Create a client talking HTTP to `config.endpoint`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`](crate::ClientError::Configuration) if
    /// the configuration is invalid.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client on a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn McpTransport>) -> Self {
        let sessions = SessionManager::new(
            transport,
            config.protocol_version.clone(),
            config.client_info.clone(),
        );
        let executor = ResilientExecutor::new(sessions, config.retry_policy);
        Self { config, executor }
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session currently held, if any
    pub fn session_id(&self) -> Option<SessionId> {
        self.executor.sessions().current()
    }

    /// Executor counters
    pub fn stats(&self) -> ExecutorStats {
        self.executor.stats()
    }

    /// Answer `question` with default options
    pub async fn query(&self, question: &str) -> QueryResult {
        self.query_with(question, &QueryOptions::default()).await
    }

    /// Answer `question`.
    ///
    /// Never fails: timeouts become `timeout` results, every other problem
    /// (exhausted retries included) an `error` result. Latency is measured
    /// from entry to whichever exit is taken.
    pub async fn query_with(&self, question: &str, options: &QueryOptions) -> QueryResult {
        let started = Instant::now();
        let arguments = self.arguments(question, options);

        match self
            .executor
            .invoke(&self.config.query_tool, arguments)
            .await
        {
            Ok(payload) => {
                let result = QueryResult::from_payload(payload, started.elapsed());
                debug!(
                    status = %result.status(),
                    latency_ms = result.latency_ms,
                    "MCP query finished"
                );
                result
            }
            Err(e) if e.is_timeout() => {
                warn!(error = %e, "MCP query timed out");
                QueryResult::timeout(started.elapsed())
            }
            Err(e) => {
                error!(error = %e, "MCP query error");
                QueryResult::error(e.to_string(), started.elapsed())
            }
        }
    }

    /// Probe the endpoint with a handshake. The session it yields is not kept.
    pub async fn health_check(&self) -> bool {
        match self.executor.sessions().handshake().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "MCP health check failed");
                false
            }
        }
    }

    /// Drop the held session and ask the server to terminate it.
    ///
    /// Best effort: failures are logged and otherwise ignored.
    pub async fn close(&self) {
        let Some(session_id) = self.executor.sessions().invalidate() else {
            return;
        };
        info!(session_id = %session_id, "Closing MCP session");
        if let Err(e) = self
            .executor
            .sessions()
            .transport()
            .terminate(session_id)
            .await
        {
            debug!(error = %e, "Session termination failed");
        }
    }

    fn arguments(&self, question: &str, options: &QueryOptions) -> Map<String, Value> {
        let mut arguments = Map::new();
        arguments.insert("query".to_string(), json!(question));
        arguments.insert(
            "max_communes".to_string(),
            json!(options.max_communes.unwrap_or(self.config.max_communes)),
        );
        if let Some(mode) = options.mode.as_ref().or(self.config.default_mode.as_ref()) {
            arguments.insert("mode".to_string(), json!(mode));
        }
        if let Some(commune) = options
            .commune
            .as_ref()
            .or(self.config.default_commune.as_ref())
        {
            arguments.insert("commune".to_string(), json!(commune));
        }
        arguments
    }
}

#[async_trait]
impl RagClient for McpGraphRagClient {
    fn system_name(&self) -> &str {
        SYSTEM_NAME
    }

    async fn query(&self, question: &str) -> QueryResult {
        McpGraphRagClient::query(self, question).await
    }

    async fn health_check(&self) -> bool {
        McpGraphRagClient::health_check(self).await
    }

    async fn close(&self) {
        McpGraphRagClient::close(self).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::retry::RetryPolicy;
    use crate::test_support::{ScriptedTransport, init_ok, reply, tool_ok};
    use graphrag_mcp_protocol::QueryStatus;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn client(transport: &Arc<ScriptedTransport>) -> McpGraphRagClient {
        let config = ClientConfig::new()
            .with_retry_policy(RetryPolicy::linear(Duration::from_millis(1), 2));
        McpGraphRagClient::with_transport(config, transport.clone())
    }

    #[tokio::test]
    async fn test_query_success() {
        let transport = ScriptedTransport::new([
            init_ok("s-1"),
            tool_ok(
                r#"{"success":true,"answer":"Les citoyens et les maires","provenance":{"communes":["Rochefort"]}}"#,
            ),
        ]);
        let client = client(&transport);

        let result = client.query("Quels personnages ?").await;

        assert_eq!(result.status(), QueryStatus::Success);
        assert_eq!(result.answer(), Some("Les citoyens et les maires"));
        assert!(result.latency_ms >= 0.0);
        let raw = result.raw_response.unwrap();
        assert_eq!(raw["performance"], json!({}));
        assert_eq!(raw["provenance"]["communes"][0], "Rochefort");

        let call = &transport.calls("tools/call")[0];
        assert_eq!(call.params["name"], "grand_debat_query_fast");
        assert_eq!(
            call.params["arguments"],
            json!({"query": "Quels personnages ?", "max_communes": 50})
        );
    }

    #[tokio::test]
    async fn test_query_with_forwards_overrides() {
        let transport = ScriptedTransport::new([init_ok("s-1"), tool_ok("ok")]);
        let client = client(&transport);

        let options = QueryOptions::new()
            .with_mode("global")
            .with_commune("Marseille")
            .with_max_communes(5);
        client.query_with("Q", &options).await;

        let call = &transport.calls("tools/call")[0];
        assert_eq!(
            call.params["arguments"],
            json!({"query": "Q", "max_communes": 5, "mode": "global", "commune": "Marseille"})
        );
    }

    #[tokio::test]
    async fn test_configured_mode_and_commune_are_forwarded() {
        let transport = ScriptedTransport::new([init_ok("s-1"), tool_ok("ok"), tool_ok("ok")]);
        let config = ClientConfig::new()
            .with_default_mode("local")
            .with_default_commune("Rochefort");
        let client = McpGraphRagClient::with_transport(config, transport.clone());

        client.query("Q").await;
        client
            .query_with("Q", &QueryOptions::new().with_commune("Marseille"))
            .await;

        let calls = transport.calls("tools/call");
        assert_eq!(
            calls[0].params["arguments"],
            json!({"query": "Q", "max_communes": 50, "mode": "local", "commune": "Rochefort"})
        );
        assert_eq!(
            calls[1].params["arguments"],
            json!({"query": "Q", "max_communes": 50, "mode": "local", "commune": "Marseille"})
        );
    }

    #[tokio::test]
    async fn test_query_exhausted_retries_is_error() {
        let transport = ScriptedTransport::new([
            init_ok("s-1"),
            Ok(reply(500, None, "boom")),
            init_ok("s-2"),
            Ok(reply(500, None, "boom")),
            init_ok("s-3"),
            Ok(reply(500, None, "boom")),
        ]);
        let client = client(&transport);

        let result = client.query("Q").await;

        assert_eq!(result.status(), QueryStatus::Error);
        assert_eq!(result.error_reason(), Some("MCP tool call failed: 500 - boom"));
        assert!(result.answer().is_none());
        assert_eq!(transport.calls("tools/call").len(), 3);
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let transport = ScriptedTransport::new([
            init_ok("s-1"),
            Err(ClientError::Timeout {
                operation: "tools/call".into(),
                timeout: Duration::from_secs(120),
            }),
        ]);
        let result = client(&transport).query("Q").await;

        assert_eq!(result.status(), QueryStatus::Timeout);
        assert!(result.answer().is_none());
        assert!(result.error_reason().is_none());
    }

    #[tokio::test]
    async fn test_query_reported_failure_uses_embedded_message() {
        let transport = ScriptedTransport::new([
            init_ok("s-1"),
            tool_ok(r#"{"success":false,"error":"graph not loaded"}"#),
        ]);
        let client = McpGraphRagClient::with_transport(
            ClientConfig::new().with_retry_policy(RetryPolicy::Never),
            transport.clone(),
        );

        let result = client.query("Q").await;
        assert_eq!(result.error_reason(), Some("graph not loaded"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let transport = ScriptedTransport::new([init_ok("probe"), Ok(reply(200, None, ""))]);
        let client = client(&transport);

        assert!(client.health_check().await);
        assert!(client.session_id().is_none());
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_transport_failure() {
        let transport = ScriptedTransport::new([Err(ClientError::Transport(
            "connection refused".into(),
        ))]);
        assert!(!client(&transport).health_check().await);
    }

    #[tokio::test]
    async fn test_close_terminates_session() {
        let transport = ScriptedTransport::new([init_ok("s-1"), tool_ok("ok")]);
        let client = client(&transport);

        client.close().await;
        assert!(transport.terminated().is_empty());

        client.query("Q").await;
        client.close().await;
        assert_eq!(transport.terminated(), vec![SessionId::from("s-1")]);
        assert!(client.session_id().is_none());
    }

    #[tokio::test]
    async fn test_rag_client_trait_object() {
        let transport = ScriptedTransport::new([init_ok("s-1"), tool_ok("ok")]);
        let client: Box<dyn RagClient> = Box::new(client(&transport));

        assert_eq!(client.system_name(), "graphrag_mcp");
        assert!(client.query("Q").await.is_success());
    }
}
