//! In-memory transport replaying a fixed script of replies.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use graphrag_mcp_protocol::JsonRpcRequest;
use graphrag_mcp_streamable::SessionId;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpReply, McpTransport};

/// A request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentRequest {
    pub(crate) method: String,
    pub(crate) id: String,
    pub(crate) session: Option<String>,
    pub(crate) params: Value,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<ClientResult<HttpReply>>>,
    sent: Mutex<Vec<SentRequest>>,
    terminated: Mutex<Vec<SessionId>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: impl IntoIterator<Item = ClientResult<HttpReply>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        })
    }

    pub(crate) fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().clone()
    }

    pub(crate) fn calls(&self, method: &str) -> Vec<SentRequest> {
        self.sent
            .lock()
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    pub(crate) fn terminated(&self) -> Vec<SessionId> {
        self.terminated.lock().clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl McpTransport for ScriptedTransport {
    fn post(
        &self,
        request: JsonRpcRequest,
        session: Option<SessionId>,
    ) -> Pin<Box<dyn Future<Output = ClientResult<HttpReply>> + Send + '_>> {
        self.sent.lock().push(SentRequest {
            method: request.method.clone(),
            id: request.id.to_string(),
            session: session.map(SessionId::into_string),
            params: request.params.unwrap_or(Value::Null),
        });
        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())));
        Box::pin(async move { next })
    }

    fn terminate(
        &self,
        session: SessionId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<()>> + Send + '_>> {
        self.terminated.lock().push(session);
        Box::pin(async { Ok(()) })
    }
}

pub(crate) fn reply(status: u16, session: Option<&str>, body: &str) -> HttpReply {
    HttpReply {
        status,
        session_id: session.map(SessionId::from),
        body: body.to_string(),
    }
}

pub(crate) fn init_ok(session: &str) -> ClientResult<HttpReply> {
    Ok(reply(200, Some(session), ""))
}

/// Event-stream body whose single `data:` line carries `text`
pub(crate) fn sse_body(text: &str) -> String {
    let envelope = json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": {"content": [{"type": "text", "text": text}]}
    });
    format!("event: message\ndata: {envelope}\n\n")
}

pub(crate) fn tool_ok(text: &str) -> ClientResult<HttpReply> {
    Ok(reply(200, None, &sse_body(text)))
}
