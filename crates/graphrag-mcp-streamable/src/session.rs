//! Session identity for a stateful MCP connection.
//!
//! The server hands out a session identifier on `initialize`; the client
//! echoes it on every later request until the session is dropped. The
//! identifier is opaque and never inspected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier issued by the server in the `Mcp-Session-Id` header.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a server-issued identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the session ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the session ID and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether the client currently holds a session.
///
/// Transitions are pure: they consume the old state and return the new one,
/// so the owner decides where the state lives and how it is locked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No handshake has succeeded yet, or the last session was dropped
    #[default]
    Absent,
    /// A session is held and attached to outgoing calls
    Active(SessionId),
}

impl SessionState {
    /// Adopt a freshly issued session, replacing whatever was held before
    #[must_use]
    pub fn establish(self, id: SessionId) -> Self {
        Self::Active(id)
    }

    /// Drop the held session
    #[must_use]
    pub fn invalidate(self) -> Self {
        Self::Absent
    }

    /// The held session, if any
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Active(id) => Some(id),
            Self::Absent => None,
        }
    }

    /// Whether a session is held
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}
