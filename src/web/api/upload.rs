use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::inspect::inspect;
use crate::common::parse::parse_json_bytes;
use crate::config::ParserSettings;
use crate::storage::uploads::extension_of;
use crate::web::state::AppState;
use crate::web::utils::{errors::ApiError, timestamp};

/// multipart 表单字段名
pub const FILE_FIELD: &str = "json_file";

/// 请求体上限在文件上限之外额外预留的 multipart 开销
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::Rejected {
        status: e.status(),
        message: e.body_text(),
    }
}

/// 上传文件预检：大小与扩展名，在解析之前执行
pub fn validate_upload(
    file_name: &str,
    size: usize,
    settings: &ParserSettings,
) -> Result<(), String> {
    if size > settings.max_file_size {
        return Err(format!(
            "File size exceeds maximum limit of {} bytes",
            settings.max_file_size
        ));
    }

    let extension = extension_of(file_name).to_ascii_lowercase();
    let allowed = settings
        .allowed_extensions
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(&extension));
    if !allowed {
        return Err(format!("File extension {} not allowed", extension));
    }

    Ok(())
}

/// 上传 JSON 文件，校验、保存并返回分析结果
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, content));
        break;
    }

    let (file_name, content) =
        upload.ok_or_else(|| ApiError::bad_request("No file provided", "未提供文件"))?;

    validate_upload(&file_name, content.len(), &state.settings.parser)
        .map_err(|message| ApiError::bad_request("File validation failed", message))?;

    let value = parse_json_bytes(&content)
        .map_err(|failure| ApiError::parse("Invalid JSON file", failure))?;

    let budget = Duration::from_secs(state.settings.server.request_timeout_secs);
    let (data, analysis) = inspect(value, state.limits(), budget).await?;

    let file_info = state
        .uploads
        .save(&file_name, &content)
        .await
        .map_err(|e| ApiError::internal("File processing error", e))?;

    info!("[Upload] JSON file uploaded successfully: {}", file_name);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "JSON文件上传和解析成功",
        "file_info": file_info,
        "data": data,
        "analysis": analysis,
        "timestamp": timestamp()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parser_settings() -> ParserSettings {
        ParserSettings {
            max_depth: 10,
            max_keys: 1000,
            max_file_size: 16,
            allowed_extensions: vec![".json".to_string()],
            upload_path: PathBuf::from("unused"),
        }
    }

    #[test]
    fn accepts_allowed_extension_case_insensitively() {
        let settings = parser_settings();
        assert_eq!(validate_upload("data.json", 10, &settings), Ok(()));
        assert_eq!(validate_upload("DATA.Json", 16, &settings), Ok(()));
    }

    #[test]
    fn rejects_oversized_files_first() {
        let settings = parser_settings();
        assert_eq!(
            validate_upload("data.txt", 17, &settings),
            Err("File size exceeds maximum limit of 16 bytes".to_string())
        );
    }

    #[test]
    fn rejects_other_extensions() {
        let settings = parser_settings();
        assert_eq!(
            validate_upload("data.txt", 1, &settings),
            Err("File extension .txt not allowed".to_string())
        );
        assert_eq!(
            validate_upload("json", 1, &settings),
            Err("File extension  not allowed".to_string())
        );
    }
}
