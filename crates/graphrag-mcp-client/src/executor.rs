//! Resilient tool-call executor.
//!
//! One logical call is a loop of attempts. Each attempt makes sure a session
//! exists, sends `tools/call`, and decodes the event stream into a
//! [`ToolPayload`]. A retryable failure drops the session, waits according to
//! the [`RetryPolicy`], and starts over with a fresh handshake.
//!
//! ```text
//! NoSession -> Initializing -> HaveSession -> Sending -> Success
//!     ^                                         |
//!     +------------ RetryableFailure <----------+--> ExhaustedFailure
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use graphrag_mcp_protocol::{CallToolParams, ToolPayload};
use graphrag_mcp_streamable::{scan_tool_payload, snippet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{CallFailure, ClientResult};
use crate::retry::{RetryPolicy, resets_session};
use crate::session::SessionManager;

/// Counters kept by the executor.
#[derive(Debug, Default)]
struct ExecutorMetrics {
    calls: AtomicU64,
    attempts: AtomicU64,
    retries: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
}

/// Serializable snapshot of the executor counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorStats {
    /// Logical calls started
    pub calls: u64,
    /// Attempts made, first ones included
    pub attempts: u64,
    /// Attempts that followed a failure
    pub retries: u64,
    /// Calls that returned a payload
    pub successes: u64,
    /// Calls that returned an error
    pub failures: u64,
    /// Initialize handshakes sent
    pub handshakes: u64,
}

impl ExecutorMetrics {
    fn snapshot(&self, handshakes: u64) -> ExecutorStats {
        ExecutorStats {
            calls: self.calls.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            handshakes,
        }
    }
}

/// Sends tool calls through a [`SessionManager`] with retries.
#[derive(Debug)]
pub struct ResilientExecutor {
    sessions: SessionManager,
    policy: RetryPolicy,
    metrics: ExecutorMetrics,
}

impl ResilientExecutor {
    /// Create an executor
    pub fn new(sessions: SessionManager, policy: RetryPolicy) -> Self {
        Self {
            sessions,
            policy,
            metrics: ExecutorMetrics::default(),
        }
    }

    /// Session manager used for every attempt
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Configured retry policy
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Counter snapshot
    pub fn stats(&self) -> ExecutorStats {
        self.metrics.snapshot(self.sessions.handshake_count())
    }

    /// Call `tool` with the configured retry budget
    pub async fn invoke(&self, tool: &str, arguments: Map<String, Value>) -> ClientResult<ToolPayload> {
        self.invoke_with_retries(tool, arguments, self.policy.max_retries())
            .await
    }

    /// Call `tool`, allowing up to `max_retries` retries after the first attempt.
    ///
    /// # Errors
    ///
    /// The last failure once the budget is spent, or the first failure that
    /// is not retryable (timeouts, local encoding problems).
    pub async fn invoke_with_retries(
        &self,
        tool: &str,
        arguments: Map<String, Value>,
        max_retries: u32,
    ) -> ClientResult<ToolPayload> {
        let policy = self.policy.with_max_retries(max_retries);
        self.metrics.calls.fetch_add(1, Ordering::Relaxed);

        let mut attempt = 0u32;
        loop {
            self.metrics.attempts.fetch_add(1, Ordering::Relaxed);

            let error = match self.attempt(tool, &arguments).await {
                Ok(payload) => {
                    self.metrics.successes.fetch_add(1, Ordering::Relaxed);
                    return Ok(payload);
                }
                Err(error) => error,
            };

            let delay = if error.is_retryable() {
                policy.delay(attempt)
            } else {
                None
            };
            let Some(delay) = delay else {
                self.metrics.failures.fetch_add(1, Ordering::Relaxed);
                debug!(
                    tool,
                    attempts = attempt + 1,
                    error = %error,
                    "MCP call gave up"
                );
                return Err(error);
            };

            warn!(
                tool,
                attempt = attempt + 1,
                max_attempts = policy.max_attempts(),
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "MCP call failed, retrying"
            );
            tokio::time::sleep(delay).await;

            if resets_session(&error) {
                self.sessions.invalidate();
            }
            self.metrics.retries.fetch_add(1, Ordering::Relaxed);
            attempt += 1;
        }
    }

    async fn attempt(&self, tool: &str, arguments: &Map<String, Value>) -> ClientResult<ToolPayload> {
        let session_id = self.sessions.ensure().await?;
        let request = CallToolParams::new(tool, arguments.clone()).into_request()?;

        let reply = self
            .sessions
            .transport()
            .post(request, Some(session_id))
            .await?;

        if !reply.is_success() {
            return Err(CallFailure::Status {
                status: reply.status,
                body: reply.body,
            }
            .into());
        }

        let payload = scan_tool_payload(&reply.body)
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| CallFailure::Unparseable {
                snippet: snippet(&reply.body).to_string(),
            })?;

        if payload.reports_failure() {
            return Err(CallFailure::Reported {
                message: payload.failure_reason().to_string(),
            }
            .into());
        }

        Ok(payload)
    }
}
