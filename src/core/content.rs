//! Tool output content model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

/// Result payload of a `tools/call`: `{"content":[...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![ContentBlock::Text { text: text.into() }] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_has_type_tag() {
        let v = serde_json::to_value(ToolOutput::text("hi")).unwrap();
        assert_eq!(v, serde_json::json!({"content":[{"type":"text","text":"hi"}]}));
    }
}
