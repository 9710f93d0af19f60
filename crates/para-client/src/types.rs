//! Wire types for the control service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC method used for tool invocations
pub const TOOLS_CALL: &str = "tools/call";
/// Tool that writes datapoint element values
pub const DP_SET_TOOL: &str = "dp-set";

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: i64,
    pub method: &'static str,
    pub params: P,
}

impl<P> JsonRpcRequest<P> {
    pub fn new(id: i64, method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Parameters of a `tools/call` request
#[derive(Debug, Clone, Serialize)]
pub struct ToolCall<A> {
    pub name: &'static str,
    pub arguments: A,
}

/// Arguments of the `dp-set` tool
#[derive(Debug, Clone, Serialize)]
pub struct DpSetArguments {
    pub datapoints: DpSetEntry,
}

/// A single element write
#[derive(Debug, Clone, Serialize)]
pub struct DpSetEntry {
    #[serde(rename = "dpeName")]
    pub dpe_name: String,
    pub value: Value,
}

impl JsonRpcRequest<ToolCall<DpSetArguments>> {
    /// Build a `dp-set` tool call
    pub fn dp_set(id: i64, dpe_name: &str, value: Value) -> Self {
        Self::new(
            id,
            TOOLS_CALL,
            ToolCall {
                name: DP_SET_TOOL,
                arguments: DpSetArguments {
                    datapoints: DpSetEntry {
                        dpe_name: dpe_name.to_string(),
                        value,
                    },
                },
            },
        )
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

/// Result of a user-initiated value write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SetOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl<E: std::fmt::Display> From<std::result::Result<(), E>> for SetOutcome {
    fn from(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}
