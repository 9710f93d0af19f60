//! Unwrapping of `tools/call` replies
//!
//! The service answers in event-stream framing. The first `data: ` line holds
//! a JSON-RPC envelope whose `result.content[0].text` is itself a JSON
//! document with the tool's result.

use serde_json::Value;
use tracing::trace;

use crate::error::{McpClientError, Result};

const DATA_PREFIX: &str = "data: ";
const DEFAULT_FAILURE: &str = "dpSet returned failure";

/// Payload of the first non-empty `data: ` line
pub fn find_data_line(body: &str) -> Option<&str> {
    body.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .find(|data| !data.is_empty())
}

/// Decode the tool result carried by a reply body
pub fn unwrap_tool_result(body: &str) -> Option<Value> {
    let data = find_data_line(body)?;
    let envelope: Value = serde_json::from_str(data).ok()?;
    let text = envelope
        .get("result")?
        .get("content")?
        .get(0)?
        .get("text")?
        .as_str()
        .filter(|text| !text.is_empty())?;
    trace!(text, "Tool result text");
    serde_json::from_str(text).ok()
}

/// Interpret a `dp-set` reply for `dpe_name`.
///
/// Only an explicit `"success": true` counts as success. On failure the
/// per-element error message is used when the service provides one.
pub fn interpret_dp_set(body: &str, dpe_name: &str) -> Result<()> {
    let payload = unwrap_tool_result(body).ok_or(McpClientError::MalformedResponse)?;

    if payload.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }

    let message = payload
        .get("data")
        .and_then(|data| data.get(dpe_name))
        .and_then(|entry| entry.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(DEFAULT_FAILURE);

    Err(McpClientError::RemoteRejected(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sse(inner: &Value) -> String {
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "content": [ { "type": "text", "text": inner.to_string() } ] }
        });
        format!("event: message\r\ndata: {}\r\n\r\n", envelope)
    }

    #[test]
    fn test_find_data_line() {
        assert_eq!(find_data_line("event: x\ndata: {}\n"), Some("{}"));
        assert_eq!(find_data_line("data: \ndata: second\n"), Some("second"));
        assert_eq!(find_data_line("{\"plain\":true}"), None);
    }

    #[test]
    fn test_success() {
        let body = sse(&json!({ "success": true }));
        assert!(interpret_dp_set(&body, "Pump1.cmd").is_ok());
    }

    #[test]
    fn test_rejection_uses_element_error() {
        let body = sse(&json!({
            "success": false,
            "data": { "Pump1.cmd": { "error": "DPE does not exist" } }
        }));
        let err = interpret_dp_set(&body, "Pump1.cmd").unwrap_err();
        assert_eq!(err.to_string(), "DPE does not exist");
    }

    #[test]
    fn test_rejection_default_message() {
        let body = sse(&json!({ "success": false }));
        let err = interpret_dp_set(&body, "Pump1.cmd").unwrap_err();
        assert_eq!(err.to_string(), "dpSet returned failure");

        let body = sse(&json!({ "status": "done" }));
        let err = interpret_dp_set(&body, "Pump1.cmd").unwrap_err();
        assert_eq!(err.to_string(), "dpSet returned failure");
    }

    #[test]
    fn test_malformed() {
        for body in [
            "",
            "data: not json\n",
            "data: {\"result\":{\"content\":[]}}\n",
            "data: {\"result\":{\"content\":[{\"text\":\"\"}]}}\n",
            "data: {\"result\":{\"content\":[{\"text\":\"oops\"}]}}\n",
        ] {
            assert!(
                matches!(
                    interpret_dp_set(body, "X.y"),
                    Err(McpClientError::MalformedResponse)
                ),
                "body {:?}",
                body
            );
        }
    }
}
