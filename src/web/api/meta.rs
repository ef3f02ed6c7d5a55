use axum::Json;
use serde_json::Value;

use crate::web::utils::timestamp;

/// 示例文档，包含多字节文本、嵌套对象与数组
pub fn sample_document() -> Value {
    serde_json::json!({
        "用户信息": {
            "姓名": "张三",
            "年龄": 28,
            "职业": "全栈开发工程师",
            "技能": ["JavaScript", "Python", "Rust", "React"],
            "联系方式": {
                "邮箱": "zhangsan@example.com",
                "电话": "138-0000-1234"
            }
        },
        "项目经验": [
            {
                "项目名称": "电商平台",
                "技术栈": ["Axum", "PostgreSQL", "Redis"],
                "状态": "已完成"
            },
            {
                "项目名称": "数据分析系统",
                "技术栈": ["Rust", "Polars", "Tokio"],
                "状态": "进行中"
            }
        ],
        "配置": {
            "主题": "dark",
            "语言": "zh-CN",
            "通知": true,
            "数据同步": false
        }
    })
}

/// 返回用于测试的示例 JSON 数据
pub async fn sample_handler() -> Json<Value> {
    Json(serde_json::json!({
        "success": true,
        "data": sample_document(),
        "message": "示例JSON数据获取成功",
        "timestamp": timestamp()
    }))
}

/// 健康检查
pub async fn health_handler() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "JSON Inspect API is running",
        "timestamp": timestamp(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
