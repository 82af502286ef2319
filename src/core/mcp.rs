//! Shared MCP protocol surface: JSON-RPC envelopes and handshake payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value as J;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "local-mcp-demo";
pub const SERVER_VERSION: &str = "1.0.0";

// JSON-RPC 2.0 reserved codes, plus the generic fault code for server-side failures.
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_FAULT: i32 = -1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResp {
    pub jsonrpc: String,
    pub id: J,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<J>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErr>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn ok(id: J, result: J) -> RpcResp {
    RpcResp { jsonrpc: JSONRPC_VERSION.into(), id, result: Some(result), error: None }
}
pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp {
        jsonrpc: JSONRPC_VERSION.into(),
        id,
        result: None,
        error: Some(RpcErr { code, message: msg.into(), data }),
    }
}

// --- initialize handshake ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// `tools` is always emitted as an object marker, even when empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ServerCapabilities {
    pub tools: serde_json::Map<String, J>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self { name: SERVER_NAME.into(), version: SERVER_VERSION.into() }
    }
}

impl InitializeResult {
    pub fn new(server_info: ServerInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.into(),
            capabilities: ServerCapabilities::default(),
            server_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_serializes_initialize_result_in_camel_case() {
        let v = serde_json::to_value(InitializeResult::new(ServerInfo::default())).unwrap();
        assert_eq!(
            v,
            json!({
                "protocolVersion": "2025-11-25",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "local-mcp-demo", "version": "1.0.0" }
            })
        );
    }

    #[test]
    fn ok_envelope_omits_error_field() {
        let s = serde_json::to_string(&ok(json!(7), json!({}))).unwrap();
        assert_eq!(s, r#"{"jsonrpc":"2.0","id":7,"result":{}}"#);
    }

    #[test]
    fn err_envelope_omits_result_and_data() {
        let s = serde_json::to_string(&err(J::Null, METHOD_NOT_FOUND, "nope", None)).unwrap();
        assert_eq!(s, r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32601,"message":"nope"}}"#);
    }
}
