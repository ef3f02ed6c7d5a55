use serde::Serialize;
use serde_json::Value;

use super::walk::{self, CeilingExceeded, ValueKind};

/// 外部请求的中止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    Canceled,
    TimedOut,
}

#[derive(Debug)]
pub enum AnalysisError {
    /// 嵌套超过绝对遍历上限
    DepthCeiling(CeilingExceeded),
    /// 调用方通过 `should_continue` 中止
    Aborted(Abort),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::DepthCeiling(exceeded) => write!(f, "{}", exceeded),
            AnalysisError::Aborted(Abort::Canceled) => write!(f, "analysis canceled"),
            AnalysisError::Aborted(Abort::TimedOut) => write!(f, "analysis timed out"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::DepthCeiling(exceeded) => Some(exceeded),
            AnalysisError::Aborted(_) => None,
        }
    }
}

impl From<CeilingExceeded> for AnalysisError {
    fn from(exceeded: CeilingExceeded) -> Self {
        AnalysisError::DepthCeiling(exceeded)
    }
}

/// 各类型节点的出现次数，六个字段始终存在
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub string: usize,
    pub number: usize,
    pub boolean: usize,
    pub null: usize,
    pub array: usize,
    pub object: usize,
}

impl TypeCounts {
    fn record(&mut self, kind: ValueKind) {
        let slot = match kind {
            ValueKind::String => &mut self.string,
            ValueKind::Number => &mut self.number,
            ValueKind::Boolean => &mut self.boolean,
            ValueKind::Null => &mut self.null,
            ValueKind::Array => &mut self.array,
            ValueKind::Object => &mut self.object,
        };
        *slot += 1;
    }

    pub fn get(&self, kind: ValueKind) -> usize {
        match kind {
            ValueKind::String => self.string,
            ValueKind::Number => self.number,
            ValueKind::Boolean => self.boolean,
            ValueKind::Null => self.null,
            ValueKind::Array => self.array,
            ValueKind::Object => self.object,
        }
    }
}

/// 单个 JSON 文档的结构统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub total_keys: usize,
    pub max_depth: usize,
    #[serde(rename = "data_types")]
    pub type_counts: TypeCounts,
    pub array_count: usize,
    pub object_count: usize,
    /// 规范文本（`", "` 与 `": "` 分隔，非 ASCII 字符原样输出）的 UTF-8 字节数
    pub size_bytes: usize,
}

pub fn analyze(value: &Value) -> Result<AnalysisReport, AnalysisError> {
    analyze_with_abort(value, || Ok(()))
}

/// 与 [`analyze`] 相同，但每访问一个节点后调用 `should_continue`，
/// 返回 `Err` 时放弃本次分析。
pub fn analyze_with_abort<F>(
    value: &Value,
    should_continue: F,
) -> Result<AnalysisReport, AnalysisError>
where
    F: Fn() -> Result<(), Abort>,
{
    let mut type_counts = TypeCounts::default();
    let mut total_keys = 0;
    let mut max_depth = 0;
    let mut size_bytes = 0;

    walk::walk(
        value,
        |node| {
            type_counts.record(node.kind);
            total_keys += node.entries;
            max_depth = max_depth.max(node.depth);
            size_bytes += walk::token_len(node.value);
        },
        || should_continue().map_err(AnalysisError::Aborted),
    )?;

    Ok(AnalysisReport {
        total_keys,
        max_depth,
        type_counts,
        array_count: type_counts.array,
        object_count: type_counts.object,
        size_bytes,
    })
}
