//! Keyword-driven template picker: the default `CodeGenerator`.

use crate::core::tool::CodeGenerator;

const BUBBLE_SORT_MARKERS: &[&str] = &["冒泡排序", "bubble sort"];
const READ_FILE_MARKERS: &[&str] = &["读取文件", "read file"];

const BUBBLE_SORT_SNIPPET: &str = r#"// 冒泡排序函数
function bubbleSort(arr) {
  const n = arr.length;
  for (let i = 0; i < n - 1; i++) {
    for (let j = 0; j < n - 1 - i; j++) {
      if (arr[j] > arr[j + 1]) {
        [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]]; // 交换元素
      }
    }
  }
  return arr;
}

// 使用示例
const testArr = [5, 2, 9, 1, 5, 6];
console.log("排序前：", testArr);
console.log("排序后：", bubbleSort(testArr));"#;

const READ_FILE_SNIPPET: &str = r#"// 读取文件内容（Node.js）
const fs = require('fs').promises;

async function readFileContent(filePath) {
  try {
    const content = await fs.readFile(filePath, 'utf8');
    console.log("文件内容：", content);
    return content;
  } catch (err) {
    console.error("读取文件失败：", err.message);
    return null;
  }
}

// 使用示例
readFileContent('./test.txt');"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    BubbleSort,
    ReadFile,
    Default,
}

/// Picks a template by substring match; first match wins, checked in a fixed order.
pub fn pick_template(prompt: &str) -> Template {
    let lowered = prompt.to_lowercase();
    let hit = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));
    if hit(BUBBLE_SORT_MARKERS) {
        Template::BubbleSort
    } else if hit(READ_FILE_MARKERS) {
        Template::ReadFile
    } else {
        Template::Default
    }
}

fn default_snippet(prompt: &str) -> String {
    format!(
        r#"// 基础函数示例
function customFunction() {{
  console.log("Hello from Local MCP Server!");
  console.log("用户需求：{prompt}");
  return "自定义代码逻辑";
}}"#
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTemplateGenerator;

impl CodeGenerator for KeywordTemplateGenerator {
    fn generate(&self, prompt: &str) -> String {
        let template = pick_template(prompt);
        tracing::debug!(?template, "template selected");
        match template {
            Template::BubbleSort => BUBBLE_SORT_SNIPPET.to_owned(),
            Template::ReadFile => READ_FILE_SNIPPET.to_owned(),
            Template::Default => default_snippet(prompt),
        }
    }
}
