//! Scanning of `text/event-stream` response bodies.
//!
//! A tool call answers with a short event stream:
//!
//! ```text
//! event: message
//! data: {"jsonrpc":"2.0","id":"...","result":{"content":[{"type":"text","text":"{...}"}]}}
//!
//! ```
//!
//! Only `data:` lines carry payload. The body is read in full before
//! scanning, so there is no incremental parser here: lines are inspected in
//! order and the first one holding a usable tool result wins.

use graphrag_mcp_protocol::{CallToolResult, JsonRpcResponse, ToolPayload};

/// Maximum number of characters of a raw body quoted in error messages
pub const SNIPPET_LEN: usize = 200;

/// Payload of every `data:` line, in order.
///
/// A single space after the colon is dropped, as is a trailing `\r`.
pub fn data_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().filter_map(|line| {
        let value = line.strip_prefix("data:")?;
        Some(value.strip_prefix(' ').unwrap_or(value).trim_end_matches('\r'))
    })
}

/// Find the first `data:` line that decodes to a tool result with text.
///
/// Lines that are not JSON, are not a JSON-RPC response, carry an error
/// instead of a result, or whose result has no leading text block are
/// skipped. Returns `None` when no line qualifies.
pub fn scan_tool_payload(body: &str) -> Option<ToolPayload> {
    data_lines(body).find_map(decode_line)
}

fn decode_line(line: &str) -> Option<ToolPayload> {
    let response: JsonRpcResponse = serde_json::from_str(line).ok()?;
    let result: CallToolResult = serde_json::from_value(response.result?).ok()?;
    result.first_text().map(ToolPayload::from_text)
}

/// At most [`SNIPPET_LEN`] characters of `text`, cut on a char boundary
pub fn snippet(text: &str) -> &str {
    match text.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tool_line(text: &str) -> String {
        let envelope = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": {"content": [{"type": "text", "text": text}]}
        });
        format!("data: {envelope}")
    }

    #[test]
    fn test_data_lines_strip_prefix() {
        let body = "event: message\r\ndata: one\r\n: comment\ndata:two\n\n";
        let lines: Vec<_> = data_lines(body).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_scan_json_text() {
        let body = format!("event: message\n{}\n\n", tool_line(r#"{"answer":"Oui","success":true}"#));
        let payload = scan_tool_payload(&body).unwrap();
        assert_eq!(payload.answer(), Some("Oui"));
        assert!(!payload.reports_failure());
    }

    #[test]
    fn test_scan_plain_text_becomes_answer() {
        let body = tool_line("Les personnages principaux sont...");
        let payload = scan_tool_payload(&body).unwrap();
        assert_eq!(payload.answer(), Some("Les personnages principaux sont..."));
    }

    #[test]
    fn test_last_well_formed_line_is_used() {
        let body = format!(
            "data: not json\ndata: {{\"jsonrpc\":\"2.0\",\"id\":\"1\",\"result\":{{\"content\":[]}}}}\ndata: {{\"truncated\"\n{}\n",
            tool_line(r#"{"answer":"last"}"#)
        );
        let payload = scan_tool_payload(&body).unwrap();
        assert_eq!(payload.answer(), Some("last"));
    }

    #[test]
    fn test_first_usable_line_wins() {
        let body = format!("{}\n{}\n", tool_line("first"), tool_line("second"));
        assert_eq!(scan_tool_payload(&body).unwrap().answer(), Some("first"));
    }

    #[test]
    fn test_error_response_is_skipped() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"id\":\"1\",\"error\":{\"code\":-32000,\"message\":\"bad\"}}\n";
        assert!(scan_tool_payload(body).is_none());
    }

    #[test]
    fn test_no_data_lines() {
        assert!(scan_tool_payload("").is_none());
        assert!(scan_tool_payload("{\"jsonrpc\":\"2.0\"}").is_none());
        assert!(scan_tool_payload("event: ping\n\n").is_none());
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), SNIPPET_LEN);
        assert_eq!(snippet("short"), "short");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_scan_never_panics(body in ".{0,512}") {
            let _ = scan_tool_payload(&body);
        }

        #[test]
        fn prop_snippet_is_prefix(text in ".{0,400}") {
            let cut = snippet(&text);
            prop_assert!(text.starts_with(cut));
            prop_assert!(cut.chars().count() <= SNIPPET_LEN);
        }
    }
}
