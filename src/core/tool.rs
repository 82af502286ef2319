use async_trait::async_trait;
use thiserror::Error;

use super::content::ToolOutput;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Message(String),
}

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
}

/// Tool = Spec + invocation
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, ToolError>;
}

/// Strategy that turns a free-text prompt into source code.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> String;
}
