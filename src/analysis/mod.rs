//! JSON 结构分析核心：共享遍历、限制校验与统计报告。
//!
//! 所有函数都是无状态的纯函数，可在多个请求间并发调用。

pub mod analyzer;
pub mod limits;
pub mod validator;
pub mod walk;

pub use analyzer::{analyze, analyze_with_abort, AnalysisError, AnalysisReport, Abort, TypeCounts};
pub use limits::{Limits, MAX_DEPTH_LIMIT};
pub use validator::{check, ValidationResult};
pub use walk::{compute_depth, count_keys, dismantle, MAX_TRAVERSAL_DEPTH};
