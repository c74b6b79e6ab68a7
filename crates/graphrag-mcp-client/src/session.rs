//! Session manager: one lazily created MCP session per client.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use graphrag_mcp_protocol::{Implementation, InitializeParams};
use graphrag_mcp_streamable::{SessionId, SessionState, snippet};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::McpTransport;

/// Owns the session identifier for one endpoint.
///
/// The state lock is only held to read or swap the state, never across an
/// `.await`. Two tasks racing through [`ensure`](Self::ensure) on an empty
/// state may therefore both run a handshake; the last one stored wins.
#[derive(Debug)]
pub struct SessionManager {
    transport: Arc<dyn McpTransport>,
    protocol_version: String,
    client_info: Implementation,
    state: Mutex<SessionState>,
    handshakes: AtomicU64,
}

impl SessionManager {
    /// Create a manager with no session
    pub fn new(
        transport: Arc<dyn McpTransport>,
        protocol_version: impl Into<String>,
        client_info: Implementation,
    ) -> Self {
        Self {
            transport,
            protocol_version: protocol_version.into(),
            client_info,
            state: Mutex::new(SessionState::Absent),
            handshakes: AtomicU64::new(0),
        }
    }

    /// Transport shared with the executor
    pub fn transport(&self) -> &Arc<dyn McpTransport> {
        &self.transport
    }

    /// Run the `initialize` handshake without touching the stored state.
    ///
    /// # Errors
    ///
    /// [`ClientError::Protocol`] if the status is not 2xx or the response
    /// has no `Mcp-Session-Id` header; transport errors as they occur.
    pub async fn handshake(&self) -> ClientResult<SessionId> {
        let request =
            InitializeParams::new(self.protocol_version.clone(), self.client_info.clone())
                .into_request()?;

        self.handshakes.fetch_add(1, Ordering::Relaxed);
        let reply = self.transport.post(request, None).await?;

        if !reply.is_success() {
            return Err(ClientError::handshake_rejected(reply.status, &reply.body));
        }

        match reply.session_id {
            Some(session_id) => {
                debug!(session_id = %session_id, "MCP session initialized");
                Ok(session_id)
            }
            None => {
                warn!(
                    response = snippet(&reply.body),
                    "No session ID in MCP response headers"
                );
                Err(ClientError::missing_session())
            }
        }
    }

    /// Run the handshake and store the resulting session
    pub async fn initialize(&self) -> ClientResult<SessionId> {
        let session_id = self.handshake().await?;
        let mut state = self.state.lock();
        *state = mem::take(&mut *state).establish(session_id.clone());
        Ok(session_id)
    }

    /// Current session, initializing one if none is held
    pub async fn ensure(&self) -> ClientResult<SessionId> {
        if let Some(session_id) = self.current() {
            return Ok(session_id);
        }
        self.initialize().await
    }

    /// Drop the held session, returning it
    pub fn invalidate(&self) -> Option<SessionId> {
        let mut state = self.state.lock();
        let previous = mem::take(&mut *state);
        let dropped = previous.session_id().cloned();
        *state = previous.invalidate();
        if let Some(ref session_id) = dropped {
            debug!(session_id = %session_id, "MCP session invalidated");
        }
        dropped
    }

    /// Held session, if any
    pub fn current(&self) -> Option<SessionId> {
        self.state.lock().session_id().cloned()
    }

    /// Snapshot of the state
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Handshakes attempted so far
    pub fn handshake_count(&self) -> u64 {
        self.handshakes.load(Ordering::Relaxed)
    }
}
