use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::analysis::{AnalysisError, ValidationResult};
use crate::common::parse::ParseFailure;

pub const CODE_INTERNAL: &str = "JSI-500";
pub const CODE_BAD_REQUEST: &str = "JSI-400";
pub const CODE_PAYLOAD_TOO_LARGE: &str = "JSI-413";
pub const CODE_TIMEOUT: &str = "JSI-408";

/// 接口层统一错误
///
/// 每个变体都会被转换为带状态码的 JSON 响应，不会向上传播到运行时。
#[derive(Debug)]
pub enum ApiError {
    /// 请求缺少必要内容或文件未通过检查
    BadRequest {
        error: &'static str,
        message: String,
    },
    /// 文本不是合法 JSON
    Parse {
        error: &'static str,
        failure: ParseFailure,
    },
    /// 值树超出深度或键数量上限
    Validation {
        reason: &'static str,
        observed: usize,
        limit: usize,
    },
    /// 提取器拒绝（请求体过大、表单格式错误等）
    Rejected { status: StatusCode, message: String },
    /// 请求处理超过 `request_timeout_secs`
    TimedOut,
    /// 意外失败，只对外暴露通用信息
    Internal {
        error: &'static str,
        details: String,
    },
}

impl ApiError {
    pub fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error,
            message: message.into(),
        }
    }

    pub fn parse(error: &'static str, failure: ParseFailure) -> Self {
        ApiError::Parse { error, failure }
    }

    pub fn internal(error: &'static str, details: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            error,
            details: details.to_string(),
        }
    }

    /// 仅在结论为 `Invalid` 时返回错误
    pub fn from_verdict(verdict: ValidationResult) -> Result<(), Self> {
        match verdict {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid {
                reason,
                observed,
                limit,
            } => Err(ApiError::Validation {
                reason,
                observed,
                limit,
            }),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::Parse { .. } | ApiError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Rejected { status, .. } => *status,
            ApiError::TimedOut => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::BadRequest { error, message } => {
                error_json(CODE_BAD_REQUEST, error, message)
            }
            ApiError::Parse { error, failure } => {
                let mut body = error_json(CODE_BAD_REQUEST, error, &failure.message);
                body["line"] = serde_json::json!(failure.line);
                body["column"] = serde_json::json!(failure.column);
                body
            }
            ApiError::Validation {
                reason,
                observed,
                limit,
            } => {
                let mut body = error_json(
                    CODE_BAD_REQUEST,
                    "JSON validation failed",
                    &format!("JSON {} ({} > {})", reason, observed, limit),
                );
                body["details"] = serde_json::json!({
                    "reason": reason,
                    "observed": observed,
                    "limit": limit,
                });
                body
            }
            ApiError::Rejected { status, message } => {
                let code = if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    CODE_PAYLOAD_TOO_LARGE
                } else if status.is_server_error() {
                    CODE_INTERNAL
                } else {
                    CODE_BAD_REQUEST
                };
                error_json(code, "Invalid request", message)
            }
            ApiError::TimedOut => error_json(CODE_TIMEOUT, "Request timeout", "请求处理超时"),
            ApiError::Internal { error, details } => {
                error_json(CODE_INTERNAL, error, &public_message("Internal error", details))
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest { error, message } => write!(f, "{}: {}", error, message),
            ApiError::Parse { error, failure } => write!(f, "{}: {}", error, failure),
            ApiError::Validation {
                reason,
                observed,
                limit,
            } => write!(f, "{} ({} > {})", reason, observed, limit),
            ApiError::Rejected { status, message } => write!(f, "{}: {}", status, message),
            ApiError::TimedOut => write!(f, "request timed out"),
            ApiError::Internal { error, details } => write!(f, "{}: {}", error, details),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Aborted(_) => ApiError::TimedOut,
            _ => ApiError::internal("Internal server error", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[Api] {}", self);
        } else {
            tracing::warn!("[Api] Rejected request: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

pub fn error_json(code: &str, error: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "error": error,
        "message": message
    })
}

pub fn public_message(safe_message: &str, details: &str) -> String {
    if cfg!(debug_assertions) {
        format!("{}: {}", safe_message, details)
    } else {
        safe_message.to_string()
    }
}
