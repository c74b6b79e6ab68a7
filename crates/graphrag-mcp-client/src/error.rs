//! Client error types.

use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the MCP endpoint.
///
/// The `Display` output of each variant is what ends up in the `error`
/// field of a failed query result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientError {
    /// The initialize handshake failed (bad status or no session header).
    #[error("{0}")]
    Protocol(String),

    /// A tool call did not produce a usable result.
    #[error(transparent)]
    CallFailed(#[from] CallFailure),

    /// The HTTP exchange exceeded the configured timeout.
    #[error("Request timed out after {timeout:?} for operation: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// The timeout duration that was exceeded
        timeout: Duration,
    },

    /// Connection-level failure (refused, reset, DNS, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A message could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The client was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Why a `tools/call` attempt failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CallFailure {
    /// Non-success HTTP status.
    #[error("MCP tool call failed: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as received
        body: String,
    },

    /// No `data:` line held a usable tool result.
    #[error("Could not parse MCP response: {snippet}")]
    Unparseable {
        /// Leading part of the raw body
        snippet: String,
    },

    /// The tool answered with `success: false`.
    #[error("{message}")]
    Reported {
        /// Message embedded by the tool
        message: String,
    },
}

impl ClientError {
    /// Handshake answered with a non-success status
    pub fn handshake_rejected(status: u16, body: &str) -> Self {
        Self::Protocol(format!("MCP init failed: {status} - {body}"))
    }

    /// Handshake succeeded but carried no session header
    pub fn missing_session() -> Self {
        Self::Protocol("No session ID in MCP response".to_string())
    }

    /// Map a `reqwest` failure, turning its timeouts into [`ClientError::Timeout`]
    pub fn from_reqwest(error: reqwest::Error, operation: &str, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                operation: operation.to_string(),
                timeout,
            }
        } else if error.is_builder() {
            Self::Configuration(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    /// Whether another attempt (after a session reset) may succeed.
    ///
    /// Timeouts are not retried; neither are local encoding or
    /// configuration problems, which would fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Protocol(_) | Self::CallFailed(_) | Self::Transport(_)
        )
    }

    /// Whether this is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        assert_eq!(
            ClientError::handshake_rejected(502, "Bad Gateway").to_string(),
            "MCP init failed: 502 - Bad Gateway"
        );
        assert_eq!(
            ClientError::missing_session().to_string(),
            "No session ID in MCP response"
        );
        assert_eq!(
            ClientError::from(CallFailure::Status {
                status: 500,
                body: "boom".into()
            })
            .to_string(),
            "MCP tool call failed: 500 - boom"
        );
        assert_eq!(
            ClientError::from(CallFailure::Reported {
                message: "graph not loaded".into()
            })
            .to_string(),
            "graph not loaded"
        );
    }

    #[test]
    fn test_classification() {
        let retryable = [
            ClientError::missing_session(),
            ClientError::from(CallFailure::Unparseable {
                snippet: "<html>".into(),
            }),
            ClientError::Transport("connection refused".into()),
        ];
        for error in &retryable {
            assert!(error.is_retryable(), "{error} should be retryable");
            assert!(!error.is_timeout());
        }

        let timeout = ClientError::Timeout {
            operation: "tools/call".into(),
            timeout: Duration::from_secs(120),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_retryable());

        assert!(!ClientError::Serialization("bad".into()).is_retryable());
        assert!(!ClientError::Configuration("bad".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_json() {
        let error: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(error, ClientError::Serialization(_)));
    }
}
