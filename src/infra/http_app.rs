use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::mcp::Dispatcher;
use crate::core::mcp::ServerInfo;
use crate::infra::config::Config;
use crate::tools::generator::KeywordTemplateGenerator;
use crate::tools::registry::build_registry;

pub const MCP_PATH: &str = "/mcp";

/// Dispatcher wired with the keyword template generator and the configured default prompt.
pub fn build_dispatcher(cfg: &Config) -> Dispatcher {
    let registry = build_registry(Arc::new(KeywordTemplateGenerator), &cfg.default_prompt);
    Dispatcher::new(registry, ServerInfo::default())
}

/// `/healthz` + JSON-RPC MCP at `/mcp`.
pub fn build_app(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(MCP_PATH, post(crate::api::mcp::http))
        .with_state(dispatcher)
}

pub fn build_app_default() -> Router {
    build_app(build_dispatcher(&Config::default()))
}
