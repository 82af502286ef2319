use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::core::error::DispatchError;
use crate::core::mcp::{err as rpc_err, ok as rpc_ok, RpcResp, PARSE_ERROR};

pub fn ok(id: serde_json::Value, result: serde_json::Value) -> Json<RpcResp> {
    Json(rpc_ok(id, result))
}

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

pub fn parse_error(message: impl Into<String>) -> Json<RpcResp> {
    error(serde_json::Value::Null, PARSE_ERROR, message)
}

/// Map a DispatchError into its JSON-RPC error envelope.
pub fn from_dispatch_error(id: serde_json::Value, err: &DispatchError) -> Json<RpcResp> {
    error(id, err.code(), err.to_string())
}

/// 400 for client-caused errors, 500 for server faults.
pub fn status_for(err: &DispatchError) -> StatusCode {
    if err.is_protocol_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub fn respond(status: StatusCode, body: Json<RpcResp>) -> Response {
    (status, body).into_response()
}
