//! Minimal MCP server: JSON-RPC 2.0 over a single HTTP endpoint (or stdio),
//! exposing one `generate_code` tool backed by canned templates.

pub mod api;
pub mod cli;
pub mod core;
pub mod infra;
pub mod tools;
