use serde::Deserialize;
use serde_json::Value;

use super::json_guard::{check_nesting, NestingError};
use crate::analysis::MAX_TRAVERSAL_DEPTH;

/// 文本无法解析为 JSON 时的错误信息，行列号来自解析器（从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseFailure {}

impl From<serde_json::Error> for ParseFailure {
    fn from(e: serde_json::Error) -> Self {
        // serde_json 对非语法类错误（如 IO）返回 0 行
        let has_position = e.line() > 0;
        Self {
            message: e.to_string(),
            line: has_position.then_some(e.line()),
            column: has_position.then_some(e.column()),
        }
    }
}

impl From<NestingError> for ParseFailure {
    fn from(e: NestingError) -> Self {
        Self {
            message: e.to_string(),
            line: Some(e.line),
            column: Some(e.column),
        }
    }
}

/// 解析 JSON 文本，括号嵌套不得超过遍历上限
pub fn parse_json(text: &str) -> Result<Value, ParseFailure> {
    parse_json_nested(text, MAX_TRAVERSAL_DEPTH)
}

/// 预检括号嵌套不超过 `max_nesting` 后解析
///
/// 解析器自身不再限制递归层级，深层嵌套时在堆上扩展调用栈。
pub fn parse_json_nested(text: &str, max_nesting: usize) -> Result<Value, ParseFailure> {
    check_nesting(text, max_nesting)?;

    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// 同 [`parse_json`]，输入为原始字节，非 UTF-8 内容视为解析失败
pub fn parse_json_bytes(bytes: &[u8]) -> Result<Value, ParseFailure> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseFailure {
        message: format!("content is not valid UTF-8: {}", e),
        line: None,
        column: None,
    })?;
    parse_json(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_valid_documents() {
        assert_eq!(parse_json(r#"{"a": [1, 2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(parse_json("null").unwrap(), json!(null));
    }

    #[test]
    fn reports_line_and_column() {
        let failure = parse_json("{\n  \"a\": 1,\n}").unwrap_err();
        assert_eq!(failure.line, Some(3));
        assert_eq!(failure.column, Some(1));
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn rejects_extreme_nesting_with_position() {
        let text = "[".repeat(MAX_TRAVERSAL_DEPTH + 1);
        let failure = parse_json(&text).unwrap_err();
        assert_eq!(
            failure.message,
            format!(
                "nesting exceeds {} levels at line 1 column {}",
                MAX_TRAVERSAL_DEPTH,
                MAX_TRAVERSAL_DEPTH + 1
            )
        );
        assert_eq!(failure.line, Some(1));
        assert_eq!(failure.column, Some(MAX_TRAVERSAL_DEPTH + 1));
    }

    #[test]
    fn parses_nesting_beyond_default_recursion_limit() {
        let text = format!("{}0{}", "[".repeat(1_500), "]".repeat(1_500));
        let value = parse_json(&text).unwrap();
        assert_eq!(crate::analysis::compute_depth(&value).unwrap(), 1_501);
        crate::analysis::dismantle(value);
    }

    #[test]
    fn nested_parse_honours_caller_limit() {
        let failure = parse_json_nested("[[[1]]]", 2).unwrap_err();
        assert_eq!(failure.line, Some(1));
        assert_eq!(failure.column, Some(3));
        assert!(parse_json_nested("[[1]]", 2).is_ok());
    }

    #[test]
    fn rejects_trailing_content() {
        let failure = parse_json("[1] [2]").unwrap_err();
        assert_eq!(failure.line, Some(1));
    }

    #[test]
    fn keeps_object_key_order() {
        let value = parse_json(r#"{"b": 1, "a": 2, "c": 3}"#).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let failure = parse_json_bytes(&[b'"', 0xff, b'"']).unwrap_err();
        assert!(failure.message.contains("UTF-8"));
        assert_eq!(failure.column, None);
    }
}
