use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::process::ExitCode;
use std::time::Duration;

use crate::core::content::ContentBlock;
use crate::core::mcp::JSONRPC_VERSION;
use crate::infra::http_app::MCP_PATH;
use crate::infra::config::Config;
use crate::tools::generate_code::GenerateCodeTool;
use crate::tools::generator::KeywordTemplateGenerator;

#[derive(Parser)]
#[command(name = "local-mcp-demo")]
#[command(about = "Local MCP demo server (JSON-RPC over HTTP) with admin commands")]
#[command(version)]
pub struct Cli {
    /// Runs the server when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping the service over JSON-RPC
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:6060")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Handshake with the service and list its tools
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:6060")]
        url: String,
    },
    /// Run generate_code locally and print its output
    Generate {
        /// Requirement text handed to the generator
        #[arg(short, long)]
        prompt: Option<String>,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(report) => {
                println!("{report}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Generate { prompt } => match generate(prompt.as_deref()).await {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Generation failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

const RPC_TIMEOUT: Duration = Duration::from_millis(500);

/// Sends one JSON-RPC request to `{base}/mcp` and returns its `result`.
/// A JSON-RPC `error` member is surfaced as the call's error, whatever the HTTP status.
async fn rpc_call(
    client: &reqwest::Client,
    base: &str,
    method: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}{}", base.trim_end_matches('/'), MCP_PATH))
        .json(&json!({ "jsonrpc": JSONRPC_VERSION, "id": method, "method": method }))
        .timeout(RPC_TIMEOUT)
        .send()
        .await?;
    let status = resp.status();
    let body: Value = resp
        .json()
        .await
        .map_err(|e| format!("{method}: HTTP {status}, unreadable body ({e})"))?;
    if let Some(err) = body.get("error") {
        let message = err["message"].as_str().unwrap_or("unknown error");
        return Err(format!("{method}: {message} ({})", err["code"]).into());
    }
    match body.get("result") {
        Some(result) if status.is_success() => Ok(result.clone()),
        _ => Err(format!("{method}: HTTP {status} without result").into()),
    }
}

/// Liveness through the dispatcher itself: a `ping` must come back with an empty result.
async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    rpc_call(&client, url, "ping").await?;
    Ok(())
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    cfg.validate()?;
    Ok(())
}

#[derive(Debug, PartialEq)]
struct StatusReport {
    protocol_version: String,
    server: String,
    /// `None` when `tools/list` failed after a successful handshake.
    tools: Option<Vec<String>>,
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "🤝 Server: {}", self.server)?;
        writeln!(f, "📜 Protocol: {}", self.protocol_version)?;
        match &self.tools {
            Some(names) => write!(f, "🔧 Tools: {}", names.join(", ")),
            None => write!(f, "🔧 Tools: ❌ unavailable"),
        }
    }
}

/// Performs the `initialize` handshake, then lists tools. Only a failed handshake is an error.
async fn show_status(url: &str) -> Result<StatusReport, Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let init = rpc_call(&client, url, "initialize").await?;
    let info = &init["serverInfo"];
    let tools = match rpc_call(&client, url, "tools/list").await {
        Ok(list) => Some(
            list["tools"]
                .as_array()
                .map(|ts| ts.iter().filter_map(|t| t["name"].as_str().map(str::to_owned)).collect())
                .unwrap_or_default(),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "tools/list failed");
            None
        }
    };
    Ok(StatusReport {
        protocol_version: init["protocolVersion"].as_str().unwrap_or("unknown").to_owned(),
        server: format!(
            "{} {}",
            info["name"].as_str().unwrap_or("?"),
            info["version"].as_str().unwrap_or("?")
        ),
        tools,
    })
}

async fn generate(prompt: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    use crate::core::tool::Tool;
    use std::sync::Arc;

    let cfg = Config::from_env();
    let tool = GenerateCodeTool::new(Arc::new(KeywordTemplateGenerator))
        .with_default_prompt(cfg.default_prompt);
    let args = match prompt {
        Some(p) => serde_json::json!({ "prompt": p }),
        None => serde_json::json!({}),
    };
    let out = tool.call(&args).await?;
    let text = out
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => text,
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for k in ["MCP_CONFIG", "MODE", "HOST", "PORT", "DEFAULT_PROMPT"] {
            env::remove_var(k);
        }
    }

    #[tokio::test]
    async fn health_check_pings_the_dispatcher() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        let ping = server.mock(|when, then| {
            when.method(POST).path("/mcp").json_body_partial(r#"{"method":"ping"}"#);
            then.status(200).json_body(json!({"jsonrpc":"2.0","id":"ping","result":{}}));
        });
        assert!(health_check(&server.base_url()).await.is_ok());
        ping.assert();
    }

    #[tokio::test]
    async fn health_check_reports_rpc_errors() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/mcp");
            then.status(400).json_body(json!({
                "jsonrpc":"2.0","id":"ping","error":{"code":-32601,"message":"method not supported: ping"}
            }));
        });
        let err = health_check(&server.base_url()).await.unwrap_err().to_string();
        assert!(err.contains("method not supported: ping"), "{err}");
        assert!(err.contains("-32601"), "{err}");

        let broken = MockServer::start();
        broken.mock(|when, then| { when.method(POST).path("/mcp"); then.status(500).body("boom"); });
        assert!(health_check(&broken.base_url()).await.is_err());
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let result = health_check("http://localhost:9").await;
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_validate_config_valid() {
        clear_env();
        env::set_var("MODE", "server");
        env::set_var("PORT", "6060");
        assert!(validate_config().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_config_invalid_mode() {
        clear_env();
        env::set_var("MODE", "invalid");
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("Invalid MODE"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_config_invalid_port() {
        clear_env();
        env::set_var("PORT", "0");
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("PORT cannot be 0"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_config_missing_file() {
        clear_env();
        env::set_var("MCP_CONFIG", "/nope/missing.toml");
        assert!(validate_config().is_err());
        clear_env();
    }

    fn mock_initialize(server: &httpmock::MockServer) -> httpmock::Mock<'_> {
        use httpmock::prelude::*;
        server.mock(|when, then| {
            when.method(POST).path("/mcp").json_body_partial(r#"{"method":"initialize"}"#);
            then.status(200).json_body(json!({
                "jsonrpc":"2.0","id":"initialize","result":{
                    "protocolVersion":"2025-11-25",
                    "capabilities":{"tools":{}},
                    "serverInfo":{"name":"local-mcp-demo","version":"1.0.0"}
                }
            }));
        })
    }

    #[tokio::test]
    async fn status_reports_handshake_and_tools() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        let init = mock_initialize(&server);
        let tools = server.mock(|when, then| {
            when.method(POST).path("/mcp").json_body_partial(r#"{"method":"tools/list"}"#);
            then.status(200).json_body(json!({
                "jsonrpc":"2.0","id":"tools/list","result":{"tools":[{"name":"generate_code"}]}
            }));
        });
        let report = show_status(&server.base_url()).await.unwrap();
        init.assert();
        tools.assert();
        assert_eq!(
            report,
            StatusReport {
                protocol_version: "2025-11-25".into(),
                server: "local-mcp-demo 1.0.0".into(),
                tools: Some(vec!["generate_code".into()]),
            }
        );
        assert!(report.to_string().contains("📜 Protocol: 2025-11-25"));
    }

    #[tokio::test]
    async fn status_survives_failing_tools_list() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        mock_initialize(&server);
        server.mock(|when, then| {
            when.method(POST).path("/mcp").json_body_partial(r#"{"method":"tools/list"}"#);
            then.status(500).body("boom");
        });
        let report = show_status(&server.base_url()).await.unwrap();
        assert_eq!(report.tools, None);
        assert!(report.to_string().contains("unavailable"));
    }

    #[tokio::test]
    async fn status_fails_when_handshake_is_rejected() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/mcp");
            then.status(500).json_body(json!({
                "jsonrpc":"2.0","id":"initialize","error":{"code":-1,"message":"internal error: down"}
            }));
        });
        let err = show_status(&server.base_url()).await.unwrap_err().to_string();
        assert!(err.starts_with("initialize:"), "{err}");
    }

    #[tokio::test]
    async fn status_fails_when_service_is_down() {
        assert!(show_status("http://localhost:9").await.is_err());
    }

    #[tokio::test]
    #[serial]
    async fn generate_uses_prompt_or_default() {
        clear_env();
        let sorted = generate(Some("写一个冒泡排序")).await.unwrap();
        assert!(sorted.contains("bubbleSort"));
        let fallback = generate(None).await.unwrap();
        assert!(fallback.contains("生成一个 JavaScript 基础函数"));
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_success_and_failure() {
        clear_env();
        assert_eq!(run_commands(Commands::Config { validate: true }).await, ExitCode::SUCCESS);
        env::set_var("MODE", "nope");
        assert_eq!(run_commands(Commands::Config { validate: true }).await, ExitCode::FAILURE);
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_health_and_status_failures() {
        let health = run_commands(Commands::Health { url: "http://localhost:9".into() }).await;
        assert_eq!(health, ExitCode::FAILURE);
        let status = run_commands(Commands::Status { url: "http://localhost:9".into() }).await;
        assert_eq!(status, ExitCode::FAILURE);
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_generate_succeeds() {
        clear_env();
        let code = run_commands(Commands::Generate { prompt: Some("read file".into()) }).await;
        assert_eq!(code, ExitCode::SUCCESS);
    }
}
