use std::sync::Arc;

use thiserror::Error;

use super::generate_code::GenerateCodeTool;
use crate::core::content::ToolOutput;
use crate::core::tool::{CodeGenerator, Tool, ToolError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Immutable after construction; clones share the same tool table.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<Vec<Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        for t in iter {
            // first registration of a name wins
            if tools.iter().all(|existing| existing.name() != t.name()) {
                tools.push(t);
            }
        }
        Self { tools: Arc::new(tools) }
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.tools
            .iter()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub async fn call(&self, name: &str, args: &serde_json::Value) -> Result<ToolOutput, RegistryError> {
        let t = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))?;
        Ok(t.call(args).await?)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

/// The process-wide registry: a single `generate_code` tool backed by `generator`.
pub fn build_registry(generator: Arc<dyn CodeGenerator>, default_prompt: &str) -> ToolRegistry {
    let generate: Arc<dyn Tool> =
        Arc::new(GenerateCodeTool::new(generator).with_default_prompt(default_prompt));
    ToolRegistry::with_tools([generate])
}
