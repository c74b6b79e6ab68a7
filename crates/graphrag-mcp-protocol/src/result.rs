//! Tool payloads and the caller-facing query result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Fallback reason when a payload reports failure without a message
pub const DEFAULT_QUERY_FAILURE: &str = "MCP query failed";

/// Structured payload decoded from the first text block of a tool result.
///
/// The text is JSON when the tool returns an object. A JSON string becomes
/// the `answer`; anything else is kept verbatim under that key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolPayload(Map<String, Value>);

impl ToolPayload {
    /// Decode the text of a content block
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self(map),
            Ok(Value::String(answer)) => Self::answer_only(answer),
            _ => Self::answer_only(text.to_string()),
        }
    }

    fn answer_only(answer: String) -> Self {
        let mut map = Map::new();
        map.insert("answer".to_string(), Value::String(answer));
        Self(map)
    }

    /// Whether the payload has no keys at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` only when the payload carries an explicit `success: false`
    pub fn reports_failure(&self) -> bool {
        matches!(self.0.get("success"), Some(Value::Bool(false)))
    }

    /// Embedded `error` message, if it is a string
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    /// Reason to report for a failed payload: the embedded message or
    /// [`DEFAULT_QUERY_FAILURE`]
    pub fn failure_reason(&self) -> &str {
        self.error_message().unwrap_or(DEFAULT_QUERY_FAILURE)
    }

    /// Embedded `answer`, if it is a string
    pub fn answer(&self) -> Option<&str> {
        self.0.get("answer").and_then(Value::as_str)
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ToolPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Coarse status of a [`QueryResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// The tool answered
    Success,
    /// The call failed for any reason other than a timeout
    Error,
    /// The HTTP exchange exceeded the configured timeout
    Timeout,
}

impl QueryStatus {
    /// Wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a query resolved to. Exactly one outcome per result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Answer text (possibly empty)
    Success {
        /// Answer returned by the tool
        answer: String,
    },
    /// Failure with a human-readable reason
    Error {
        /// Why the query failed
        #[serde(rename = "error")]
        reason: String,
    },
    /// Transport timeout, no answer
    Timeout,
}

impl QueryOutcome {
    /// Coarse status of this outcome
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Success { .. } => QueryStatus::Success,
            Self::Error { .. } => QueryStatus::Error,
            Self::Timeout => QueryStatus::Timeout,
        }
    }
}

/// Result of a single query, including how long it took.
///
/// Serializes as a flat object:
///
/// ```json
/// {"status": "success", "answer": "...", "latencyMs": 812.4, "rawResponse": {...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Outcome, flattened into `status` plus `answer` or `error`
    #[serde(flatten)]
    pub outcome: QueryOutcome,
    /// Wall-clock milliseconds from call start to resolution
    pub latency_ms: f64,
    /// Decoded payload with `performance` and `provenance` always present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl QueryResult {
    /// Successful result
    pub fn success(answer: impl Into<String>, elapsed: Duration, raw_response: Option<Value>) -> Self {
        Self {
            outcome: QueryOutcome::Success {
                answer: answer.into(),
            },
            latency_ms: millis(elapsed),
            raw_response,
        }
    }

    /// Failed result
    pub fn error(reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            outcome: QueryOutcome::Error {
                reason: reason.into(),
            },
            latency_ms: millis(elapsed),
            raw_response: None,
        }
    }

    /// Timed-out result
    pub fn timeout(elapsed: Duration) -> Self {
        Self {
            outcome: QueryOutcome::Timeout,
            latency_ms: millis(elapsed),
            raw_response: None,
        }
    }

    /// Build a result from a decoded tool payload.
    ///
    /// An explicit `success: false` becomes an error result carrying the
    /// embedded message. Otherwise the answer is taken as-is (empty when
    /// missing) and the whole payload is kept as `raw_response`, with empty
    /// `performance` and `provenance` objects filled in when absent.
    pub fn from_payload(payload: ToolPayload, elapsed: Duration) -> Self {
        if payload.reports_failure() {
            return Self::error(payload.failure_reason(), elapsed);
        }

        let answer = payload.answer().unwrap_or_default().to_string();
        let mut raw = payload.into_inner();
        for key in ["performance", "provenance"] {
            raw.entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
        }

        Self::success(answer, elapsed, Some(Value::Object(raw)))
    }

    /// Coarse status
    pub fn status(&self) -> QueryStatus {
        self.outcome.status()
    }

    /// Whether the query succeeded
    pub fn is_success(&self) -> bool {
        self.status() == QueryStatus::Success
    }

    /// Answer text on success
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            QueryOutcome::Success { answer } => Some(answer),
            _ => None,
        }
    }

    /// Failure reason on error
    pub fn error_reason(&self) -> Option<&str> {
        match &self.outcome {
            QueryOutcome::Error { reason } => Some(reason),
            _ => None,
        }
    }
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: Value) -> ToolPayload {
        match value {
            Value::Object(map) => ToolPayload::from(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_payload_from_json_object() {
        let p = ToolPayload::from_text(r#"{"answer":"Marianne","success":true}"#);
        assert_eq!(p.answer(), Some("Marianne"));
        assert!(!p.reports_failure());
    }

    #[test]
    fn test_payload_from_plain_text() {
        let p = ToolPayload::from_text("just words");
        assert_eq!(p.answer(), Some("just words"));
        assert_eq!(p.as_map().len(), 1);
    }

    #[test]
    fn test_payload_from_non_object_json_is_literal() {
        let p = ToolPayload::from_text("[1,2,3]");
        assert_eq!(p.answer(), Some("[1,2,3]"));
    }

    #[test]
    fn test_payload_from_json_string_is_unquoted() {
        let p = ToolPayload::from_text("\"oui\"");
        assert_eq!(p.answer(), Some("oui"));
    }

    #[test]
    fn test_reports_failure_only_on_explicit_false() {
        assert!(payload(json!({"success": false})).reports_failure());
        assert!(!payload(json!({"success": "false"})).reports_failure());
        assert!(!payload(json!({"answer": "x"})).reports_failure());
    }

    #[test]
    fn test_from_payload_fills_diagnostics() {
        let result = QueryResult::from_payload(
            payload(json!({"answer": "Les citoyens", "performance": {"total_ms": 41}})),
            Duration::from_millis(12),
        );

        assert_eq!(result.status(), QueryStatus::Success);
        assert_eq!(result.answer(), Some("Les citoyens"));
        let raw = result.raw_response.unwrap();
        assert_eq!(raw["performance"], json!({"total_ms": 41}));
        assert_eq!(raw["provenance"], json!({}));
        assert_eq!(raw["answer"], "Les citoyens");
    }

    #[test]
    fn test_from_payload_missing_answer_is_empty() {
        let result = QueryResult::from_payload(payload(json!({"entities": []})), Duration::ZERO);
        assert_eq!(result.answer(), Some(""));
    }

    #[test]
    fn test_from_payload_embedded_failure() {
        let result = QueryResult::from_payload(
            payload(json!({"success": false, "error": "graph not loaded"})),
            Duration::from_millis(3),
        );
        assert_eq!(result.status(), QueryStatus::Error);
        assert_eq!(result.error_reason(), Some("graph not loaded"));
        assert!(result.raw_response.is_none());

        let bare = QueryResult::from_payload(payload(json!({"success": false})), Duration::ZERO);
        assert_eq!(bare.error_reason(), Some(DEFAULT_QUERY_FAILURE));
    }

    #[test]
    fn test_serialized_shape() {
        let ok = QueryResult::success("oui", Duration::from_millis(250), None);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "success", "answer": "oui", "latencyMs": 250.0})
        );

        let err = QueryResult::error("boom", Duration::from_millis(1));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "error": "boom", "latencyMs": 1.0})
        );

        let timeout = QueryResult::timeout(Duration::from_secs(2));
        assert_eq!(
            serde_json::to_value(&timeout).unwrap(),
            json!({"status": "timeout", "latencyMs": 2000.0})
        );
    }

    #[test]
    fn test_deserialize_round_trip_keeps_outcome() {
        let parsed: QueryResult =
            serde_json::from_str(r#"{"status":"error","error":"x","latencyMs":5.5}"#).unwrap();
        assert_eq!(parsed.error_reason(), Some("x"));
        assert_eq!(parsed.latency_ms, 5.5);
    }
}
