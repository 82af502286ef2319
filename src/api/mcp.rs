//! JSON-RPC method dispatch for the MCP endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value as J};

use crate::core::envelope::{classify, Envelope};
use crate::core::error::DispatchError;
use crate::core::mcp::{InitializeResult, RpcResp, ServerInfo};
use crate::infra::http::json as http_json;
use crate::infra::logging::log_metric;
use crate::tools::registry::{RegistryError, ToolRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpMethod {
    Initialize,
    Ping,
    ToolsList,
    ToolsCall,
}

const METHOD_TABLE: &[(&str, McpMethod)] = &[
    ("initialize", McpMethod::Initialize),
    ("ping", McpMethod::Ping),
    ("tools/list", McpMethod::ToolsList),
    ("tools/call", McpMethod::ToolsCall),
];

impl McpMethod {
    pub fn lookup(name: &str) -> Option<Self> {
        METHOD_TABLE.iter().find(|(n, _)| *n == name).map(|(_, m)| *m)
    }
}

/// Rendered in error messages when the request carries no usable `method`.
const MISSING_METHOD: &str = "(none)";

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: RpcResp,
}

impl Reply {
    fn new(id: J, outcome: Result<J, DispatchError>) -> Self {
        match outcome {
            Ok(result) => Reply { status: StatusCode::OK, body: http_json::ok(id, result).0 },
            Err(e) => Reply {
                status: http_json::status_for(&e),
                body: http_json::from_dispatch_error(id, &e).0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Notifications get an empty body.
    NoContent,
    Reply(Reply),
}

/// Stateless request handler; the registry is shared read-only across clones.
#[derive(Clone)]
pub struct Dispatcher {
    registry: ToolRegistry,
    server_info: ServerInfo,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, server_info: ServerInfo) -> Self {
        Self { registry, server_info }
    }

    pub async fn dispatch(&self, msg: J) -> Dispatched {
        let envelope = classify(&msg);
        let method_label = envelope.method().unwrap_or(MISSING_METHOD).to_owned();
        match envelope {
            Envelope::Notification { .. } => {
                tracing::debug!(method = %method_label, "notification received, no response");
                log_metric("mcp", "notifications_total", 1);
                Dispatched::NoContent
            }
            Envelope::Request { id, method, params } => {
                tracing::debug!(method = %method_label, id = %id, "request received");
                // Run on its own task so a panicking handler becomes a -1 envelope
                // instead of tearing down the connection.
                let this = self.clone();
                let handled = tokio::spawn(async move { this.handle(method, params).await }).await;
                let outcome = handled.unwrap_or_else(|join| {
                    let msg = panic_message(join);
                    tracing::error!(method = %method_label, error = %msg, "request handler faulted");
                    Err(DispatchError::Internal(msg))
                });
                let reply = Reply::new(id, outcome);
                tracing::debug!(response = ?reply.body, status = %reply.status, "request completed");
                Dispatched::Reply(reply)
            }
        }
    }

    async fn handle(&self, method: Option<String>, params: J) -> Result<J, DispatchError> {
        let name = method.as_deref().unwrap_or(MISSING_METHOD);
        let Some(m) = McpMethod::lookup(name) else {
            tracing::warn!(method = %name, "unsupported method");
            return Err(DispatchError::MethodNotFound(name.to_owned()));
        };
        log_metric(name, "requests_total", 1);
        match m {
            McpMethod::Initialize => {
                Ok(serde_json::to_value(InitializeResult::new(self.server_info.clone()))?)
            }
            McpMethod::Ping => Ok(json!({})),
            McpMethod::ToolsList => {
                let tools = serde_json::to_value(self.registry.list())?;
                Ok(json!({ "tools": tools }))
            }
            McpMethod::ToolsCall => self.call_tool(&params).await,
        }
    }

    async fn call_tool(&self, params: &J) -> Result<J, DispatchError> {
        let call = CallParams::from_params(params);
        let name = call.name.ok_or(DispatchError::ToolNameEmpty)?;
        tracing::info!(tool = %name, "tools/call");
        let out = self.registry.call(name, &call.arguments).await.map_err(|e| match e {
            RegistryError::NotFound(n) => DispatchError::ToolNotFound(n),
            RegistryError::Tool(t) => DispatchError::Internal(t.to_string()),
        })?;
        Ok(serde_json::to_value(out)?)
    }
}

/// `tools/call` parameters. `name`/`arguments` win over the legacy `toolName`/`args`.
#[derive(Debug, PartialEq)]
pub struct CallParams<'a> {
    pub name: Option<&'a str>,
    pub arguments: J,
}

impl<'a> CallParams<'a> {
    pub fn from_params(params: &'a J) -> Self {
        let non_empty = |key: &str| params.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty());
        let present = |key: &str| params.get(key).filter(|v| !v.is_null());
        Self {
            name: non_empty("name").or_else(|| non_empty("toolName")),
            arguments: present("arguments")
                .or_else(|| present("args"))
                .cloned()
                .unwrap_or_else(|| json!({})),
        }
    }
}

fn panic_message(join: tokio::task::JoinError) -> String {
    if !join.is_panic() {
        return join.to_string();
    }
    let payload = join.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_owned()
    }
}

// HTTP handler
pub async fn http(State(dispatcher): State<Dispatcher>, body: Bytes) -> Response {
    let msg: J = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request body");
            return http_json::respond(StatusCode::BAD_REQUEST, http_json::parse_error(format!("parse error: {e}")));
        }
    };
    tracing::debug!(request = %msg, "HTTP handler invoked");
    match dispatcher.dispatch(msg).await {
        Dispatched::NoContent => StatusCode::NO_CONTENT.into_response(),
        Dispatched::Reply(Reply { status, body }) => http_json::respond(status, axum::Json(body)),
    }
}
