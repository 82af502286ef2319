use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::core::content::ToolOutput;
use crate::core::tool::{CodeGenerator, Tool, ToolError, ToolSpec};

pub const TOOL_NAME: &str = "generate_code";
pub const DEFAULT_PROMPT: &str = "生成一个 JavaScript 基础函数";

#[derive(Clone)]
pub struct GenerateCodeTool {
    generator: Arc<dyn CodeGenerator>,
    default_prompt: String,
}

impl GenerateCodeTool {
    pub fn new(generator: Arc<dyn CodeGenerator>) -> Self {
        Self { generator, default_prompt: DEFAULT_PROMPT.into() }
    }

    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_prompt = prompt.into();
        self
    }

    /// Missing, empty or non-string prompts fall back to the default prompt.
    fn prompt_from<'a>(&'a self, arguments: &'a serde_json::Value) -> &'a str {
        arguments
            .get("prompt")
            .and_then(|v| v.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(self.default_prompt.as_str())
    }
}

pub fn render_response(prompt: &str, code: &str) -> String {
    format!("\n【本地 MCP 服务响应】\n需求：{prompt}\n生成的代码：\n```javascript\n{code}\n```\n")
}

impl ToolSpec for GenerateCodeTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }
    fn description(&self) -> &'static str {
        "根据用户需求生成自定义代码"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "代码生成的需求描述（如：生成冒泡排序函数）"
                }
            },
            "required": ["prompt"]
        })
    }
}

#[async_trait]
impl Tool for GenerateCodeTool {
    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, ToolError> {
        let prompt = self.prompt_from(arguments);
        let code = self.generator.generate(prompt);
        if code.is_empty() {
            return Err(ToolError::Message("generator produced no code".into()));
        }
        tracing::debug!(prompt = %prompt, bytes = code.len(), "generate_code produced snippet");
        Ok(ToolOutput::text(render_response(prompt, &code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentBlock;
    use crate::tools::generator::KeywordTemplateGenerator;

    fn tool() -> GenerateCodeTool {
        GenerateCodeTool::new(Arc::new(KeywordTemplateGenerator))
    }

    fn text_of(out: ToolOutput) -> String {
        match out.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => text,
            None => panic!("no content block"),
        }
    }

    #[tokio::test]
    async fn it_wraps_code_in_a_fenced_block() {
        let text = text_of(tool().call(&json!({"prompt":"写一个冒泡排序"})).await.unwrap());
        assert!(text.contains("需求：写一个冒泡排序"));
        assert!(text.contains("```javascript\n// 冒泡排序函数"));
        assert!(text.trim_end().ends_with("```"));
    }

    #[tokio::test]
    async fn missing_prompt_uses_default() {
        let text = text_of(tool().call(&json!({})).await.unwrap());
        assert!(text.contains(&format!("需求：{DEFAULT_PROMPT}")));
        assert!(text.contains("function customFunction()"));
    }

    #[tokio::test]
    async fn empty_or_non_string_prompt_uses_default() {
        let empty = text_of(tool().call(&json!({"prompt": ""})).await.unwrap());
        assert!(empty.contains(DEFAULT_PROMPT));
        let number = text_of(tool().call(&json!({"prompt": 42})).await.unwrap());
        assert!(number.contains(DEFAULT_PROMPT));
        let null_args = text_of(tool().call(&serde_json::Value::Null).await.unwrap());
        assert!(null_args.contains(DEFAULT_PROMPT));
    }

    #[tokio::test]
    async fn configured_default_prompt_is_honoured() {
        let t = tool().with_default_prompt("hello world");
        let text = text_of(t.call(&json!({})).await.unwrap());
        assert!(text.contains("用户需求：hello world"));
    }

    #[test]
    fn schema_requires_prompt() {
        let schema = tool().input_schema();
        assert_eq!(schema["required"], json!(["prompt"]));
        assert_eq!(schema["properties"]["prompt"]["type"], "string");
    }
}
