use serde::{Deserialize, Serialize};

/// `max_depth` 可配置的最大值
///
/// 通过校验的值会被完整序列化回显，而序列化按嵌套层级递归。
pub const MAX_DEPTH_LIMIT: usize = 1_000;

/// 结构校验上限
///
/// 每个请求由调用方构造并显式传入，核心逻辑不读取任何全局配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// 允许的最大嵌套深度（根节点为 1），默认 10
    pub max_depth: usize,
    /// 允许的键值对总数，默认 1000
    pub max_keys: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_keys: 1000,
        }
    }
}
