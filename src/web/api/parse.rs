use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap},
    Form, Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::inspect::inspect;
use crate::analysis::MAX_DEPTH_LIMIT;
use crate::common::parse::{parse_json, parse_json_nested};
use crate::web::state::AppState;
use crate::web::utils::{errors::ApiError, timestamp};

#[derive(Deserialize)]
pub struct JsonStringForm {
    #[serde(default)]
    pub json_string: String,
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// 解析并分析 JSON 数据
///
/// - `application/json`：请求体本身即为待分析的值
/// - 其他类型：从表单字段 `json_string` 中读取 JSON 文本
pub async fn parse_handler(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let text = if is_json_content(req.headers()) {
        let body = Bytes::from_request(req, &state)
            .await
            .map_err(|rejection| ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;
        String::from_utf8(body.to_vec()).map_err(|e| {
            ApiError::bad_request("Invalid JSON format", format!("body is not UTF-8: {}", e))
        })?
    } else {
        let Form(form) = Form::<JsonStringForm>::from_request(req, &state)
            .await
            .map_err(|rejection| ApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;
        form.json_string
    };

    if text.trim().is_empty() {
        return Err(ApiError::bad_request(
            "No JSON data provided",
            "未提供JSON数据",
        ));
    }

    let value =
        parse_json(&text).map_err(|failure| ApiError::parse("Invalid JSON format", failure))?;

    let budget = Duration::from_secs(state.settings.server.request_timeout_secs);
    let (data, analysis) = inspect(value, state.limits(), budget).await?;

    info!(
        "[Parse] JSON parsed successfully. Keys: {}, Depth: {}",
        analysis.total_keys, analysis.max_depth
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "JSON解析成功",
        "data": data,
        "analysis": analysis,
        "timestamp": timestamp()
    })))
}

/// 简单解析：请求体为 `{"json_string": "..."}`，只返回解析结果，不做校验与统计
///
/// 结果会被完整回显，括号嵌套不得超过 [`MAX_DEPTH_LIMIT`]。
pub async fn simple_parse_handler(body: Bytes) -> Result<Json<Value>, ApiError> {
    let envelope: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::parse("JSON decode error", e.into()))?;

    let json_string = envelope
        .get("json_string")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if json_string.is_empty() {
        return Err(ApiError::bad_request(
            "No JSON string provided",
            "未提供JSON字符串",
        ));
    }

    let data = parse_json_nested(json_string, MAX_DEPTH_LIMIT)
        .map_err(|failure| ApiError::parse("JSON decode error", failure))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": data,
        "message": "JSON parsed successfully"
    })))
}
